//! Upload to Package Drone.
//!
//! The [`Orchestrator`] walks a [`crate::containment::Forest`] and issues one
//! PUT per artifact through a [`Transport`], reporting progress to a
//! [`LogSink`]. [`ReqwestTransport`] and [`TracingSink`] are the production
//! implementations.

mod orchestrator;
mod report;
mod request;
mod response;
mod sink;
mod transport;

pub use orchestrator::Orchestrator;
pub use report::{UploadKind, UploadReport, UploadedArtifact};
pub use request::{artifact_query, pom_query, upload_url, UploadRequest};
pub use response::remote_id;
pub use sink::{Level, LogSink, MemorySink, TracingSink};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportResponse, DEFAULT_TIMEOUT_SECS,
};
