/// Summary statistics of a set of `f32` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Upper median for even-sized sets.
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes the statistics of `values`, or `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gamebot_training::stats::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let median = values[values.len() / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

/// Fitness distribution and gene diversity of one sorted generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSummary {
    pub fitness: DescriptiveStats,
    /// Mean over all genes of the per-gene standard deviation across the population.
    pub mean_gene_std_dev: f32,
}

impl GenerationSummary {
    /// Summarizes a population given as parallel fitness and parameter rows.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(fitness: &[f32], parameters: &[Vec<f32>]) -> Option<Self> {
        let fitness = DescriptiveStats::new(fitness.iter().copied())?;
        let gene_count = parameters.first().map_or(0, Vec::len);
        let spreads: Vec<f32> = (0..gene_count)
            .filter_map(|i| DescriptiveStats::new(parameters.iter().map(|p| p[i])))
            .map(|s| s.std_dev)
            .collect();
        let mean_gene_std_dev = if spreads.is_empty() {
            0.0
        } else {
            spreads.iter().sum::<f32>() / spreads.len() as f32
        };
        Some(Self {
            fitness,
            mean_gene_std_dev,
        })
    }
}
