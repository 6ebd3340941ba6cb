// Linear scale - Map a data domain onto a pixel range

/// A linear mapping from `domain` to `range`.
///
/// A zero-width domain maps every input to the start of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;

        let span = d1 - d0;
        let t = if span == 0.0 { 0.0 } else { (x - d0) / span };

        r0 + t * (r1 - r0)
    }
}
