pub mod sdk;
pub mod progress;
pub mod attribute_xp;
pub mod global_xp;
#[cfg(feature="system-growth_prediction")] pub mod growth_prediction;
#[cfg(feature="system-resources")]         pub mod resources;
#[cfg(feature="system-badges")]            pub mod badges;
