mod clean;
mod generate;

pub use clean::{clean_generated_files, find_generated_files, GENERATED_SUFFIX};
pub use generate::{
    build_sdk, generate_sdk, generate_sdk_from_spec, render_sdk, GenerateOptions, GeneratedFile,
    GenerationReport,
};
