//! Configuration loading and settings structures

mod settings;

pub use settings::{
    GeneralSettings, OutgoingSettings, ProviderConfig, ProxySettings, SearchSettings, Settings,
};
