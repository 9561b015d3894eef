/// Count, sum and mean of one numeric field over a whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub average: f64,
}

impl Summary {
    pub fn of<T>(records: &[T], value: impl Fn(&T) -> f64) -> Self {
        let count = records.len();
        let total: f64 = records.iter().map(value).sum();
        let average = if count == 0 { 0.0 } else { total / count as f64 };

        Self { count, total, average }
    }
}
