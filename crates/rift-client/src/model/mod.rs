//! Document model of the imposter Admin API.
//!
//! Plain data: construction and equality only. Wire encoding lives in
//! [`crate::codec`].

mod imposter;
mod payload;
mod predicate;
mod response;
mod server;

pub use imposter::{Imposter, Protocol, Stub};
pub use payload::{
    HttpRequest, HttpResponse, MultiValues, RequestPayload, ResponseMode, ResponsePayload,
    TcpRequest, TcpResponse,
};
pub use predicate::{Comparison, JsonPath, Operation, Predicate, XPath};
pub use response::{Behaviors, Proxy, ProxyMode, Response, ResponseKind};
pub use server::{Config, ConfigOptions, Log, ProcessInfo};

pub(crate) use predicate::{OP_AND, OP_EXISTS, OP_INJECT, OP_NOT, OP_OR};
pub(crate) use response::{TYPE_FAULT, TYPE_INJECT, TYPE_IS, TYPE_PROXY};
