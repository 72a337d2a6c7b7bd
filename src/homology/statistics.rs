use super::aligner::AlignmentWarning;
use super::anomaly::AnomalyReport;
use super::switcher::NonConservedTemplate;
use crate::model::types::ConformationState;
use serde::Serialize;

/// Summary of one homology-model alignment, written next to the PIR file.
///
/// Residue counts describe the alignment after bulge and constriction handling but before
/// non-conserved residues are switched; `switched` tells how many of the `non_conserved`
/// positions were then brought in line with the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatistics {
    pub reference: String,
    pub uniprot_id: String,
    pub state: ConformationState,
    pub main_template: String,
    pub preferred_chain: char,
    pub main_template_similarity: u32,
    pub reference_length: usize,
    pub conserved: usize,
    pub non_conserved: usize,
    pub switched: usize,
    #[serde(flatten)]
    pub anomalies: AnomalyReport,
    pub non_conserved_templates: Vec<NonConservedTemplate>,
    pub warnings: Vec<AlignmentWarning>,
}

impl ModelStatistics {
    /// Share of reference residues conserved in the template, in percent.
    pub fn identity(&self) -> f64 {
        if self.reference_length == 0 {
            return 0.0;
        }
        100.0 * self.conserved as f64 / self.reference_length as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homology::anomaly::AnomalyRecord;

    fn statistics() -> ModelStatistics {
        ModelStatistics {
            reference: "opr_mouse".to_string(),
            uniprot_id: "P42866".to_string(),
            state: ConformationState::Inactive,
            main_template: "4DKL".to_string(),
            preferred_chain: 'A',
            main_template_similarity: 81,
            reference_length: 200,
            conserved: 150,
            non_conserved: 40,
            switched: 12,
            anomalies: AnomalyReport {
                reference_bulges: vec![AnomalyRecord {
                    location: "2x551".to_string(),
                    template: Some("3EML".to_string()),
                }],
                ..AnomalyReport::default()
            },
            non_conserved_templates: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn identity_is_conserved_share() {
        assert!((statistics().identity() - 75.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_anomaly_lists_at_top_level() {
        let value = serde_json::to_value(statistics()).unwrap();
        assert_eq!(value["state"], "Inactive");
        assert_eq!(value["preferred_chain"], "A");
        assert_eq!(value["reference_bulges"][0]["location"], "2x551");
        assert_eq!(value["reference_bulges"][0]["template"], "3EML");
        assert!(value["template_constrictions"].as_array().unwrap().is_empty());
    }
}
