use crate::Stft;

/// What 0 dB corresponds to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reference {
    /// The loudest magnitude of the analysed data. Every value ends up at or below 0 dB.
    Max,
    /// A fixed magnitude.
    Value(f64),
}

/// Parameters for converting magnitudes to decibels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DbScale {
    pub reference: Reference,
    /// Magnitudes below this are treated as this value to keep `log10` finite.
    pub amin: f64,
    /// Values more than this many decibels below the maximum are raised to that floor. `None` disables the floor.
    pub top_db: Option<f64>,
}

impl Default for DbScale {
    fn default() -> Self {
        DbScale {
            reference: Reference::Max,
            amin: 1e-5,
            top_db: Some(80.0),
        }
    }
}

impl DbScale {
    /// `20 * log10(max(amin, magnitude) / max(amin, reference))`
    fn convert(&self, magnitude: f64, reference: f64) -> f64 {
        20.0 * magnitude.max(self.amin).log10() - 20.0 * reference.max(self.amin).log10()
    }
}

impl Stft {
    /// Convert the magnitudes to decibels.
    /// The returned [`Stft`] has the same shape and holds decibel values instead of magnitudes.
    /// Fails if `amin` isn't strictly positive or `top_db` is negative.
    pub fn to_db(&self, scale: DbScale) -> anyhow::Result<Stft> {
        anyhow::ensure!(
            scale.amin > 0.0,
            "amin must be strictly positive, got {}",
            scale.amin
        );
        if let Some(top_db) = scale.top_db {
            anyhow::ensure!(top_db >= 0.0, "top_db must be non-negative, got {top_db}");
        }
        let reference = match scale.reference {
            Reference::Max => self.max().unwrap_or(0.0),
            Reference::Value(value) => value.abs(),
        };
        let mut data = self
            .data
            .iter()
            .map(|transient| {
                transient
                    .iter()
                    .map(|&magnitude| scale.convert(magnitude, reference))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        if let Some(top_db) = scale.top_db {
            let db = Stft { data };
            if let Some(max) = db.max() {
                let floor = max - top_db;
                data = db
                    .data
                    .into_iter()
                    .map(|transient| transient.into_iter().map(|x| x.max(floor)).collect())
                    .collect();
            } else {
                data = db.data;
            }
        }

        log::trace!("Converted to decibels relative to {reference}");
        Ok(Stft { data })
    }
}
