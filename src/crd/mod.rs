pub mod model_serving;
