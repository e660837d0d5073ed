pub mod pipeline_properties;
