//! Transform backend boundary
//!
//! Translates conditions into backend requests and defines the client port
//! through which they are sent.

pub mod client;
pub mod config;
pub mod fixed;
pub mod request;

pub use client::{
    HttpTransformClient, RawSeriesPayload, TransformClient, TransformError, TransformResponse,
};
pub use config::TransformConfig;
pub use fixed::FixedTransformClient;
pub use request::{translate, DataQuery, EpochRange, PluginContext, TransformRequest};
