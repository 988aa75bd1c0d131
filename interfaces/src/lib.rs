pub mod baseline;
pub mod defs;

pub use baseline::RandomLabelPolicy;
pub use defs::{
    Article, Inference, Label, LabelPolicy, RawArticleBatch, TrainingRow, TrainingTable,
    TEXT_SEPARATOR,
};
