//! Handlers choosing one delegate per request.

mod hostname;
mod method;
mod mount;
mod path;
mod rule;

pub use hostname::{DEFAULT_HOST, HostnameSwitch, HostnameSwitchBuilder};
pub use method::{MethodSwitch, MethodSwitchBuilder};
pub use mount::{Mounts, MountsBuilder};
pub use path::{PathSwitch, PathSwitchBuilder};
pub use rule::{PathRule, PlaceholderRule, RegexRule};
