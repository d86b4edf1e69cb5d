use std::{collections::HashSet, fmt, io::Write};

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

/// Handlers take positional string arguments and report only through side effects.
pub type Handler<S> = fn(&mut S, &[String]) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exact(want) => n == want,
            Arity::AtLeast(min) => n >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => f.write_str("exactly 1 argument"),
            Arity::Exact(n) => write!(f, "exactly {n} arguments"),
            Arity::AtLeast(1) => f.write_str("at least 1 argument"),
            Arity::AtLeast(n) => write!(f, "at least {n} arguments"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("Unknown RPC method: {0}")]
    UnknownMethod(String),
    #[error("RPC method {method} expects {expected}, got {got}")]
    BadArguments {
        method: String,
        expected: Arity,
        got: usize,
    },
    #[error("RPC method {0} registered twice")]
    DuplicateMethod(&'static str),
}

pub struct Method<S> {
    pub name: &'static str,
    pub arity: Arity,
    pub handler: Handler<S>,
}

impl<S> Method<S> {
    pub fn new(name: &'static str, arity: Arity, handler: Handler<S>) -> Self {
        Self {
            name,
            arity,
            handler,
        }
    }
}

/// Closed set of methods callable from menu clicks.
pub struct RpcTable<S> {
    methods: Vec<Method<S>>,
}

impl<S> RpcTable<S> {
    pub fn new(methods: Vec<Method<S>>) -> Result<Self, RpcError> {
        let mut seen = HashSet::new();
        for m in &methods {
            if !seen.insert(m.name) {
                return Err(RpcError::DuplicateMethod(m.name));
            }
        }
        Ok(Self { methods })
    }

    pub fn get(&self, name: &str) -> Option<&Method<S>> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.iter().map(|m| m.name)
    }
}

/// Something the plugin entry point can drive.
pub trait RpcService: Sized {
    /// Full menu render for a no-argument invocation.
    fn render(&mut self, out: &mut dyn Write) -> Result<()>;

    fn methods(&self) -> Result<RpcTable<Self>, RpcError>;
}

/// Routes one process invocation: no args renders, otherwise `args[0]` names a method.
pub fn run<S: RpcService>(service: &mut S, args: &[String], out: &mut dyn Write) -> Result<()> {
    let Some((name, rest)) = args.split_first() else {
        return service.render(out);
    };

    let table = service.methods()?;
    let method = table
        .get(name)
        .ok_or_else(|| RpcError::UnknownMethod(name.clone()))?;
    if !method.arity.accepts(rest.len()) {
        return Err(RpcError::BadArguments {
            method: name.clone(),
            expected: method.arity,
            got: rest.len(),
        }
        .into());
    }

    debug!(method = %name, args = ?rest, "rpc call");
    (method.handler)(service, rest)
}
