use rand::Rng;

use crate::defs::Article;
use crate::defs::Label;
use crate::defs::LabelPolicy;

/// Placeholder labeling: an independent fair coin flip per article.
///
/// This stands in for a real label source. It carries no signal, so a model
/// trained on its output predicts noise; only the structural contract (every
/// row gets a binary label) is meaningful.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomLabelPolicy;

impl LabelPolicy for RandomLabelPolicy {
    fn assign(&self, _article: &Article) -> Label {
        if rand::rng().random_bool(0.5) {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}
