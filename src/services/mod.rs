pub mod ai_service;
pub mod concept_service;
pub mod export_service;
pub mod extraction_service;
pub mod generator_service;
pub mod normalizer;
pub mod scoring_service;
pub mod session_store;
