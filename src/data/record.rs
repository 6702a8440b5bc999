/// Number of numeric features per Iris sample.
pub const FEATURE_COUNT: usize = 4;

/// One raw sample: four measurements and a class name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
    pub class: String,
}

impl Record {
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.sepal_length, self.sepal_width, self.petal_length, self.petal_width]
    }
}

/// A sample whose class has been replaced by its one-hot vector.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub features: [f64; FEATURE_COUNT],
    pub label: Vec<f64>,
}

/// Ordered, immutable collection of encoded samples plus the category list
/// that defines the one-hot positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<EncodedRecord>,
    categories: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<EncodedRecord>, categories: Vec<String>) -> Dataset {
        Dataset { records, categories }
    }

    pub fn records(&self) -> &[EncodedRecord] {
        &self.records
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index-aligned (features, labels) matrices.
    pub fn matrices(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        self.records
            .iter()
            .map(|r| (r.features.to_vec(), r.label.clone()))
            .unzip()
    }
}
