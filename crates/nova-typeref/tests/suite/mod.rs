mod config;
mod function_conversion;
mod logging;
mod reference_model;
mod substitution;
