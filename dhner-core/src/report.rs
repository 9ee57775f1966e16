//! # Avaliação de Rótulos BIO
//!
//! Compara os rótulos preditos com um Golden Standard, arquivo a arquivo,
//! e calcula um relatório de classificação por rótulo (precisão, revocação,
//! F1 e suporte). Os relatórios de vários arquivos são depois agrupados por
//! rótulo e suas métricas médias impressas numa tabela.
//!
//! A avaliação é feita por token e por tipo: `B-LOC` e `I-LOC` contam ambos
//! como `LOC`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tagger::Tag;

/// Rótulo de tokens fora de entidade.
pub const OUTSIDE_LABEL: &str = "O";

/// Rótulos considerados no resumo final.
pub const SUMMARY_LABELS: &[&str] = &["LOC", "PER", "ORG", "OTH", OUTSIDE_LABEL];

/// Lê um rótulo por linha não vazia de um arquivo `.bio`.
///
/// Usa o último campo da linha: `B-X`/`I-X` viram `X`; o que não for uma tag
/// reconhecida conta como `O`.
pub fn extract_labels(bio_content: &str) -> Vec<String> {
    bio_content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_whitespace()
                .last()
                .and_then(Tag::from_label)
                .and_then(|tag| tag.category())
                .map(|cat| cat.name().to_string())
                .unwrap_or_else(|| OUTSIDE_LABEL.to_string())
        })
        .collect()
}

/// Métricas de um rótulo (ou de uma média).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

/// Relatório de classificação de um par gold/predito.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Métricas por rótulo, em ordem alfabética.
    pub labels: BTreeMap<String, LabelMetrics>,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: LabelMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: LabelMetrics,
}

impl ClassificationReport {
    /// Calcula o relatório. As duas sequências precisam ter o mesmo tamanho.
    ///
    /// Métricas indefinidas (divisão por zero) valem 0.
    pub fn compute(gold: &[String], pred: &[String]) -> Result<Self> {
        if gold.len() != pred.len() {
            return Err(Error::LabelCountMismatch {
                gold: gold.len(),
                pred: pred.len(),
            });
        }

        let label_set: BTreeSet<&str> = gold.iter().chain(pred.iter()).map(String::as_str).collect();

        let mut labels = BTreeMap::new();
        for &label in &label_set {
            let mut true_pos = 0usize;
            let mut pred_count = 0usize;
            let mut support = 0usize;
            for (g, p) in gold.iter().zip(pred) {
                let is_gold = g == label;
                let is_pred = p == label;
                if is_gold {
                    support += 1;
                }
                if is_pred {
                    pred_count += 1;
                }
                if is_gold && is_pred {
                    true_pos += 1;
                }
            }

            let precision = ratio(true_pos, pred_count);
            let recall = ratio(true_pos, support);
            labels.insert(
                label.to_string(),
                LabelMetrics {
                    precision,
                    recall,
                    f1_score: f1(precision, recall),
                    support,
                },
            );
        }

        let correct = gold.iter().zip(pred).filter(|(g, p)| g == p).count();
        let total = gold.len();

        let n_labels = labels.len() as f64;
        let mut macro_avg = LabelMetrics { support: total, ..Default::default() };
        let mut weighted_avg = LabelMetrics { support: total, ..Default::default() };
        for m in labels.values() {
            macro_avg.precision += m.precision / n_labels;
            macro_avg.recall += m.recall / n_labels;
            macro_avg.f1_score += m.f1_score / n_labels;

            let weight = ratio(m.support, total);
            weighted_avg.precision += m.precision * weight;
            weighted_avg.recall += m.recall * weight;
            weighted_avg.f1_score += m.f1_score * weight;
        }

        Ok(Self {
            labels,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
        })
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Acumula as métricas de um rótulo ao longo de vários relatórios.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportAverager {
    pub label: String,
    reports: Vec<LabelMetrics>,
}

impl ReportAverager {
    pub fn new(label: impl Into<String>, first: LabelMetrics) -> Self {
        Self {
            label: label.into(),
            reports: vec![first],
        }
    }

    pub fn add(&mut self, metrics: LabelMetrics) {
        self.reports.push(metrics);
    }

    pub fn precision(&self) -> f64 {
        self.mean(|m| m.precision)
    }

    pub fn recall(&self) -> f64 {
        self.mean(|m| m.recall)
    }

    pub fn f1_score(&self) -> f64 {
        self.mean(|m| m.f1_score)
    }

    fn mean(&self, field: impl Fn(&LabelMetrics) -> f64) -> f64 {
        let total: f64 = self.reports.iter().map(field).sum();
        total / self.reports.len() as f64
    }
}

/// Agrupa os rótulos de [`SUMMARY_LABELS`] de todos os relatórios, em ordem alfabética.
pub fn average_reports(reports: &[ClassificationReport]) -> Vec<ReportAverager> {
    let mut grouped: BTreeMap<&str, ReportAverager> = BTreeMap::new();

    for report in reports {
        for (label, metrics) in &report.labels {
            if !SUMMARY_LABELS.contains(&label.as_str()) {
                continue;
            }
            grouped
                .entry(label.as_str())
                .and_modify(|averager| averager.add(*metrics))
                .or_insert_with(|| ReportAverager::new(label.clone(), *metrics));
        }
    }

    grouped.into_values().collect()
}

/// Tabela de médias com largura fixa; a linha `O` vem sempre por último.
pub fn render_summary(averagers: &[ReportAverager]) -> String {
    let width = averagers
        .iter()
        .map(|a| a.label.len())
        .max()
        .unwrap_or(0)
        .max(3);

    let mut out = String::from("\n\n");
    out.push_str(&format!(
        "{:>width$}  {:>9} {:>9} {:>9}\n\n",
        "", "precision", "recall", "f1-score",
        width = width
    ));

    let row = |a: &ReportAverager| {
        format!(
            "{:>width$}  {:>9.3} {:>9.3} {:>9.3} \n",
            a.label,
            a.precision(),
            a.recall(),
            a.f1_score(),
            width = width
        )
    };

    let mut outside_row = None;
    for averager in averagers {
        if averager.label == OUTSIDE_LABEL {
            outside_row = Some(row(averager));
        } else {
            out.push_str(&row(averager));
        }
    }
    if let Some(r) = outside_row {
        out.push_str(&r);
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_extract_labels() {
        let content = "DE O\nEERSTE B-LOC\nStraat I-LOC\n\nBESTE B-PER\nDUS B-OTHER\nX I-ORG\nLOCAL O\n";
        assert_eq!(
            extract_labels(content),
            labels(&["O", "LOC", "LOC", "PER", "OTH", "ORG", "O"])
        );
    }

    #[test]
    fn test_perfect_prediction() {
        let gold = labels(&["O", "LOC", "O", "PER", "LOC"]);
        let report = ClassificationReport::compute(&gold, &gold).unwrap();
        assert!(close(report.accuracy, 1.0));
        assert!(close(report.macro_avg.f1_score, 1.0));
        assert!(close(report.weighted_avg.f1_score, 1.0));
        assert_eq!(report.labels["LOC"].support, 2);
    }

    #[test]
    fn test_partial_prediction() {
        // mesmo exemplo do docstring original do relatório
        let gold = labels(&["LOC", "LOC", "PER", "O", "O", "LOC"]);
        let pred = labels(&["LOC", "O", "PER", "O", "O", "O"]);
        let report = ClassificationReport::compute(&gold, &pred).unwrap();

        let loc = report.labels["LOC"];
        assert!(close(loc.precision, 1.0));
        assert!(close(loc.recall, 1.0 / 3.0));
        assert!(close(loc.f1_score, 0.5));
        assert_eq!(loc.support, 3);

        let outside = report.labels["O"];
        assert!(close(outside.precision, 0.5));
        assert!(close(outside.recall, 1.0));
        assert!(close(report.accuracy, 4.0 / 6.0));
    }

    #[test]
    fn test_label_only_in_prediction_has_zero_metrics() {
        let gold = labels(&["O", "O"]);
        let pred = labels(&["ORG", "O"]);
        let report = ClassificationReport::compute(&gold, &pred).unwrap();
        let org = report.labels["ORG"];
        assert_eq!(org.support, 0);
        assert!(close(org.precision, 0.0));
        assert!(close(org.recall, 0.0));
        assert!(close(org.f1_score, 0.0));
    }

    #[test]
    fn test_length_mismatch() {
        let err = ClassificationReport::compute(&labels(&["O"]), &labels(&["O", "O"])).unwrap_err();
        assert!(matches!(err, Error::LabelCountMismatch { gold: 1, pred: 2 }));
    }

    #[test]
    fn test_average_reports_groups_by_label() {
        let a = ClassificationReport::compute(&labels(&["LOC", "O"]), &labels(&["LOC", "O"])).unwrap();
        let b = ClassificationReport::compute(&labels(&["LOC", "O"]), &labels(&["O", "O"])).unwrap();
        let averagers = average_reports(&[a, b]);

        let names: Vec<&str> = averagers.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(names, vec!["LOC", "O"]);

        let loc = &averagers[0];
        assert!(close(loc.precision(), 0.5));
        assert!(close(loc.recall(), 0.5));
        let outside = &averagers[1];
        assert!(close(outside.precision(), 0.75));
    }

    #[test]
    fn test_render_summary_puts_outside_last() {
        let report = ClassificationReport::compute(
            &labels(&["O", "PER", "LOC"]),
            &labels(&["O", "PER", "LOC"]),
        )
        .unwrap();
        let table = render_summary(&average_reports(&[report]));

        let o_pos = table.find("\n  O").unwrap();
        let loc_pos = table.find("LOC").unwrap();
        let per_pos = table.find("PER").unwrap();
        assert!(loc_pos < per_pos && per_pos < o_pos);
        assert!(table.contains("precision"));
        assert!(table.contains("1.000"));
    }
}
