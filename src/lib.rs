#![warn(missing_docs)]
//! AntiGen - prompt-to-image generation with simulated progress.
//!
//! This crate wraps the hosted Pollinations image endpoint: it builds the
//! templated request URL from a prompt and rendering options, downloads the
//! payload, and animates a believable progress indicator while waiting. The
//! endpoint offers no progress feedback channel, so the percentage is a
//! phased simulation that only reaches 100% once the payload has arrived.
//!
//! # Quick Start
//!
//! ```no_run
//! use antigen::{GenerationRequest, ImageProvider, PollinationsProvider};
//!
//! #[tokio::main]
//! async fn main() -> antigen::Result<()> {
//!     let provider = PollinationsProvider::builder().build()?;
//!     let request = GenerationRequest::new("A red fox in the snow");
//!     let image = provider.generate(&request).await?;
//!     image.save("fox.jpg")?;
//!     Ok(())
//! }
//! ```
//!
//! # Sessions and progress
//!
//! For an interactive surface, wrap the provider in a
//! [`GenerationSession`]: it guards against concurrent attempts, enforces
//! the 40 second deadline, and streams [`GenerationEvent`]s (simulated
//! progress, completion, failure, timeout) to whatever renders them.
//!
//! ```no_run
//! use antigen::{
//!     GenerationRequest, GenerationSession, PollinationsProvider, SessionConfig,
//! };
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> antigen::Result<()> {
//!     let provider = Arc::new(PollinationsProvider::builder().build()?);
//!     let (events, mut updates) = mpsc::unbounded_channel();
//!     let session = GenerationSession::new(provider, SessionConfig::default(), events);
//!
//!     tokio::spawn(async move {
//!         while let Some(event) = updates.recv().await {
//!             println!("{event:?}");
//!         }
//!     });
//!
//!     let image = session.generate(GenerationRequest::new("A red fox")).await?;
//!     image.save("fox.jpg")?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod config;
mod error;
pub mod image;
pub mod progress;
pub mod session;

// Re-export error types at crate root
pub use error::{AntiGenError, Result};

pub use account::AccountClient;
pub use config::{ProjectConfig, SessionConfig};
pub use image::{
    AspectRatio, GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat,
    ImageProvider, PollinationsProvider, PollinationsProviderBuilder,
};
pub use progress::{Phase, ProgressSimulator, ProgressUpdate, PHASES};
pub use session::{GenerationEvent, GenerationSession};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{AntiGenError, Result};
    pub use crate::image::{
        GeneratedImage, GenerationRequest, ImageProvider, PollinationsProvider,
    };
    pub use crate::session::{GenerationEvent, GenerationSession};
}
