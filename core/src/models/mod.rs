//! Data models for reports and monitor status.

mod report;
mod status;

pub use report::{
    ContainerInfo, ContainerPort, DockerMeta, PortKey, PortMappings, PortRange, PortRecord,
    Report, SCHEMA_VERSION,
};
pub use status::{HostStatus, NvmeDeviceStatus, PingHostStatus};
