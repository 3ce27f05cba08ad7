//! Service bundle generation: naming, the registration shim and the bundler
//! configuration for one eligible package

pub mod config;
pub mod identity;
pub mod naming;
pub mod wrapper;

pub use config::{
    BuildConfiguration, ConfigFactory, ModuleOptions, ModuleRule, OutputOptions, PluginSpec,
};
pub use identity::ServiceIdentity;
pub use naming::{entry_name, upper_camel_case};
pub use wrapper::ServiceWrapper;
