//! Core normalization building blocks: size thresholds and parameters, tier
//! selection, dimension math, frame flattening and resampling, and the
//! `ImageNormalizer` that ties them together. Consumed by the high-level `api`
//! module.
pub mod normalizer;
pub mod params;
pub mod processing;
