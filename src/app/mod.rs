pub mod celebration;
