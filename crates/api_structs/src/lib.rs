mod admin;
mod notification;
mod settings;
mod status;

pub mod dtos {
    pub use crate::notification::dtos::*;
    pub use crate::settings::dtos::*;
    pub use crate::status::dtos::*;
}

pub use crate::admin::api::*;
pub use crate::notification::api::*;
pub use crate::settings::api::*;
pub use crate::status::api::*;
