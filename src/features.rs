//! Labelled input samples consumed by the network.

/// Normalized feature values plus the class label they belong to.
///
/// The network only ever reads a `FeatureVector`; producing and normalizing
/// them is the job of whatever data pipeline feeds it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
    label: usize,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>, label: usize) -> Self {
        Self { values, label }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn label(&self) -> usize {
        self.label
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<(Vec<f64>, usize)> for FeatureVector {
    fn from((values, label): (Vec<f64>, usize)) -> Self {
        Self::new(values, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_accessors() {
        let fv = FeatureVector::new(vec![0.1, 0.2, 0.3], 2);
        assert_eq!(fv.len(), 3);
        assert_eq!(fv.label(), 2);
        assert_eq!(fv.values(), &[0.1, 0.2, 0.3]);
        assert!(!fv.is_empty());
    }

    #[test]
    fn test_from_tuple() {
        let fv: FeatureVector = (vec![1.0], 0).into();
        assert_eq!(fv, FeatureVector::new(vec![1.0], 0));
    }
}
