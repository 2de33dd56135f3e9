//! ArkStorm Data Model
//!
//! Defines the data contracts shared by the download and video stages:
//! - **View:** which provider product/region/parameter to download, and how
//!   to label its frames
//! - **Frame / Cycle:** a forecast run and the frames selected from it
//! - **Video / Clip:** how downloaded views are assembled into a video
//! - **Config:** the TOML pipeline configuration tying them together

pub mod config;
pub mod frame;
pub mod video;
pub mod view;

pub use config::*;
pub use frame::*;
pub use video::*;
pub use view::*;
