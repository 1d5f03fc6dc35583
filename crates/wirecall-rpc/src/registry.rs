//! Server-side function table.
//!
//! Handlers are ordinary Rust functions or closures with typed parameters.
//! At registration each one is wrapped in a proxy that knows how to unpack
//! its argument tuple and encode its return value, then stored behind the
//! uniform [`Invoke`] interface. Dispatch never sees the real types.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};
use wirecall_codec::{Codec, Encode, Unpack};

use crate::envelope::Response;
use crate::error::{Result, RpcError};

/// A registered handler with its types erased.
pub trait Invoke: Send + Sync {
    /// Decode the arguments from `args`, run the handler, and return the
    /// encoded success envelope.
    fn invoke(&self, args: &mut Codec) -> wirecall_codec::Result<Bytes>;
}

/// A callable taking the argument tuple `Args`.
///
/// Implemented for every `Fn(A, B, ...) -> R` of up to eight parameters.
pub trait Handler<Args>: Send + Sync + 'static {
    type Output: Encode;

    fn call(&self, args: Args) -> Self::Output;
}

/// A callable taking a receiver `&S` followed by the argument tuple `Args`.
///
/// Implemented for every `Fn(&S, A, B, ...) -> R` of up to eight parameters
/// after the receiver, which covers `S::method` paths.
pub trait Method<S, Args>: Send + Sync + 'static {
    type Output: Encode;

    fn call(&self, receiver: &S, args: Args) -> Self::Output;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> Handler<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret + Send + Sync + 'static,
            Ret: Encode,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn call(&self, ($($arg,)*): ($($arg,)*)) -> Ret {
                (self)($($arg),*)
            }
        }

        impl<Func, Recv, Ret, $($arg,)*> Method<Recv, ($($arg,)*)> for Func
        where
            Func: Fn(&Recv, $($arg),*) -> Ret + Send + Sync + 'static,
            Ret: Encode,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn call(&self, receiver: &Recv, ($($arg,)*): ($($arg,)*)) -> Ret {
                (self)(receiver, $($arg),*)
            }
        }
    };
}

impl_handler!();
impl_handler!(A);
impl_handler!(A, B);
impl_handler!(A, B, C);
impl_handler!(A, B, C, D);
impl_handler!(A, B, C, D, E);
impl_handler!(A, B, C, D, E, F);
impl_handler!(A, B, C, D, E, F, G);
impl_handler!(A, B, C, D, E, F, G, H);

struct FnProxy<H, Args> {
    handler: H,
    _args: PhantomData<fn(Args)>,
}

impl<H, Args> Invoke for FnProxy<H, Args>
where
    H: Handler<Args>,
    Args: Unpack + 'static,
{
    fn invoke(&self, args: &mut Codec) -> wirecall_codec::Result<Bytes> {
        let args = Args::unpack(args)?;
        Response::success(self.handler.call(args)).to_bytes()
    }
}

struct MethodProxy<S, M, Args> {
    receiver: Arc<S>,
    method: M,
    _args: PhantomData<fn(Args)>,
}

impl<S, M, Args> Invoke for MethodProxy<S, M, Args>
where
    S: Send + Sync + 'static,
    M: Method<S, Args>,
    Args: Unpack + 'static,
{
    fn invoke(&self, args: &mut Codec) -> wirecall_codec::Result<Bytes> {
        let args = Args::unpack(args)?;
        Response::success(self.method.call(&self.receiver, args)).to_bytes()
    }
}

/// Mapping from call name to handler.
///
/// Built up front, then moved into a [`Server`](crate::Server), which
/// shares it read-only between connections.
///
/// ```
/// use wirecall_rpc::Registry;
///
/// let mut registry = Registry::new();
/// registry.register("add", |a: i32, b: i32| a + b)?;
/// assert!(registry.contains("add"));
/// # Ok::<(), wirecall_rpc::RpcError>(())
/// ```
#[derive(Default)]
pub struct Registry {
    handlers: BTreeMap<String, Box<dyn Invoke>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function or closure under `name`.
    ///
    /// Fails with [`RpcError::DuplicateHandler`] if the name is taken.
    pub fn register<H, Args>(&mut self, name: impl Into<String>, handler: H) -> Result<()>
    where
        H: Handler<Args>,
        Args: Unpack + 'static,
    {
        self.insert(
            name.into(),
            Box::new(FnProxy {
                handler,
                _args: PhantomData,
            }),
        )
    }

    /// Register `method` bound to a shared `receiver`.
    pub fn register_method<S, M, Args>(
        &mut self,
        name: impl Into<String>,
        receiver: Arc<S>,
        method: M,
    ) -> Result<()>
    where
        S: Send + Sync + 'static,
        M: Method<S, Args>,
        Args: Unpack + 'static,
    {
        self.insert(
            name.into(),
            Box::new(MethodProxy {
                receiver,
                method,
                _args: PhantomData,
            }),
        )
    }

    /// Remove the handler for `name`. Returns whether one was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.handlers.remove(name).is_some();
        if removed {
            debug!(function = name, "unregistered handler");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Run the handler for `name` over the encoded argument list `args` and
    /// return the encoded response envelope.
    ///
    /// An unknown name is not an error: it yields a
    /// [`Status::FunctionNotRegistered`](crate::Status::FunctionNotRegistered)
    /// envelope. Arguments that fail to decode are.
    pub fn dispatch(&self, name: &str, args: &[u8]) -> wirecall_codec::Result<Bytes> {
        let Some(entry) = self.handlers.get(name) else {
            debug!(function = name, "call to unregistered function");
            return Response::<()>::not_registered(name).to_bytes();
        };

        let mut codec = Codec::from_slice(args);
        let reply = entry.invoke(&mut codec)?;
        if codec.remaining() > 0 {
            warn!(
                function = name,
                trailing = codec.remaining(),
                "ignoring trailing argument bytes"
            );
        }
        Ok(reply)
    }

    fn insert(&mut self, name: String, entry: Box<dyn Invoke>) -> Result<()> {
        match self.handlers.entry(name) {
            Entry::Occupied(occupied) => Err(RpcError::DuplicateHandler(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                debug!(function = %vacant.key(), "registered handler");
                vacant.insert(entry);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
