use fail::FailScenario;

/// Failpoints configured for the lifetime of the value.
///
/// Every configured failpoint is turned off again when the scenario is dropped, so a failing
/// test does not leak its failpoints into the next one.
pub struct FailpointScenario<'a> {
    _scenario: FailScenario<'a>,
    failpoints: Vec<String>,
}

impl<'a> FailpointScenario<'a> {
    /// Configures each `(failpoint, action)` pair, e.g. `("dispatch.before_action", "1*return(ignore)")`.
    pub fn setup(failpoints: &[(&str, &str)]) -> FailpointScenario<'a> {
        let scenario = FailScenario::setup();

        for (failpoint, action) in failpoints {
            fail::cfg(*failpoint, action).unwrap();
        }

        Self {
            _scenario: scenario,
            failpoints: failpoints
                .iter()
                .map(|(failpoint, _)| failpoint.to_string())
                .collect(),
        }
    }
}

impl Drop for FailpointScenario<'_> {
    fn drop(&mut self) {
        for failpoint in &self.failpoints {
            fail::remove(failpoint);
        }
    }
}
