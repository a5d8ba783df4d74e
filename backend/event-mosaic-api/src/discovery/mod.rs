//! Service registry integration

mod eureka;

pub use eureka::{
    DataCenterInfo, DiscoveryError, DiscoveryHandle, EurekaClient, InstanceInfo,
    InstanceRegistration, LeaseInfo, PortInfo, RetryPolicy,
};
