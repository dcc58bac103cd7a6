use crate::Grade;

/// A 0-100 factor score with its explanatory notes.
pub trait FactorScore {
    /// Display name of the factor.
    fn name(&self) -> &'static str;

    fn score(&self) -> f64;

    fn notes(&self) -> &[String];

    fn grade(&self) -> Grade {
        Grade::from_score(self.score())
    }

    /// Lead note, used for headline summaries.
    fn headline(&self) -> Option<&str> {
        self.notes().first().map(String::as_str)
    }
}
