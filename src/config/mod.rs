//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::Config;
pub use site::SeoConfig;
pub use site::SiteConfig;
pub use site::SocialConfig;
pub use site::ThemeConfig;
