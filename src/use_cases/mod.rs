pub mod submit_preorder;

pub use submit_preorder::SubmitPreorder;
