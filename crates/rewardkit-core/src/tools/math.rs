//! Numeric tools: arithmetic, vector similarity, feature scaling, clustering

use serde_json::{json, Map, Value};

use super::{ParamKind, ParamSpec, ToolArgs, ToolRegistry, ToolSpec};
use crate::bail_invalid;
use crate::error::{RewardError, Result};

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolSpec {
            name: "multiply",
            description: "Product of two numbers, rounded to 4 decimals",
            params: vec![
                ParamSpec::required("first_val", ParamKind::Number),
                ParamSpec::required("second_val", ParamKind::Number),
            ],
        },
        multiply,
    );
    registry.register(
        ToolSpec {
            name: "calculate_similarity",
            description: "Cosine similarity between two equal-length vectors",
            params: vec![
                ParamSpec::required("vector_a", ParamKind::Array),
                ParamSpec::required("vector_b", ParamKind::Array),
            ],
        },
        calculate_similarity,
    );
    registry.register(
        ToolSpec {
            name: "normalize_features",
            description: "Min-max normalize the named features across data points",
            params: vec![
                ParamSpec::required("data", ParamKind::Array),
                ParamSpec::required("feature_names", ParamKind::Array),
            ],
        },
        normalize_features,
    );
    registry.register(
        ToolSpec {
            name: "cluster_analysis",
            description: "Spread centroids around the feature means and assign points round-robin",
            params: vec![
                ParamSpec::required("data_points", ParamKind::Array),
                ParamSpec::optional("num_clusters", ParamKind::Integer, Some(json!(3))),
            ],
        },
        cluster_analysis,
    );
    registry.register(
        ToolSpec {
            name: "return_true",
            description: "Always returns true",
            params: Vec::new(),
        },
        |_| Ok(Value::Bool(true)),
    );
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn multiply(args: &ToolArgs) -> Result<Value> {
    let product = args.number("first_val")? * args.number("second_val")?;
    Ok(json!(round4(product)))
}

/// Cosine similarity; 0.0 when either vector has zero magnitude
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(RewardError::invalid_value(
            "vectors",
            format!("lengths differ ({} vs {})", a.len(), b.len()),
        ));
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (mag_a * mag_b))
}

fn calculate_similarity(args: &ToolArgs) -> Result<Value> {
    let a = args.numbers("vector_a")?;
    let b = args.numbers("vector_b")?;
    Ok(json!(cosine_similarity(&a, &b)?))
}

fn points<'a>(args: &'a ToolArgs, name: &str) -> Result<Vec<&'a Map<String, Value>>> {
    args.array(name)?
        .iter()
        .map(|p| {
            p.as_object().ok_or_else(|| {
                RewardError::invalid_value("argument", format!("{name} must contain only objects"))
            })
        })
        .collect()
}

fn feature(point: &Map<String, Value>, name: &str) -> f64 {
    point.get(name).and_then(Value::as_f64).unwrap_or(0.0)
}

fn normalize_features(args: &ToolArgs) -> Result<Value> {
    let data = points(args, "data")?;
    let names = args.strings("feature_names")?;
    if data.is_empty() {
        return Ok(json!([]));
    }

    let ranges: Vec<(f64, f64)> = names
        .iter()
        .map(|name| {
            data.iter()
                .map(|p| feature(p, name))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                })
        })
        .collect();

    let normalized: Vec<Value> = data
        .iter()
        .map(|point| {
            let mut out = (*point).clone();
            for (name, (lo, hi)) in names.iter().zip(&ranges) {
                let scaled = if hi - lo != 0.0 {
                    (feature(point, name) - lo) / (hi - lo)
                } else {
                    0.0
                };
                out.insert(name.to_string(), json!(scaled));
            }
            Value::Object(out)
        })
        .collect();

    Ok(Value::Array(normalized))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0.0 for fewer than two values
fn sample_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn cluster_analysis(args: &ToolArgs) -> Result<Value> {
    let data = points(args, "data_points")?;
    let k = args.integer("num_clusters")?;
    if k < 1 {
        bail_invalid!("num_clusters", format!("{k} (must be at least 1)"));
    }
    if data.is_empty() {
        return Ok(json!({"clusters": [], "centroids": []}));
    }
    let k = k as usize;

    let names: Vec<&String> = data[0].keys().collect();
    let stats: Vec<(f64, f64)> = names
        .iter()
        .map(|name| {
            let values: Vec<f64> = data.iter().map(|p| feature(p, name)).collect();
            (mean(&values), sample_stdev(&values))
        })
        .collect();

    let centroids: Vec<Value> = (0..k)
        .map(|i| {
            let offset = i as f64 - k as f64 / 2.0;
            let centroid: Map<String, Value> = names
                .iter()
                .zip(&stats)
                .map(|(name, (m, sd))| ((*name).clone(), json!(m + offset * sd * 0.5)))
                .collect();
            Value::Object(centroid)
        })
        .collect();

    let mut clusters: Vec<Vec<Value>> = vec![Vec::new(); k];
    for (i, point) in data.iter().enumerate() {
        clusters[i % k].push(Value::Object((*point).clone()));
    }
    let sizes: Vec<usize> = clusters.iter().map(Vec::len).collect();

    Ok(json!({
        "num_clusters": k,
        "centroids": centroids,
        "clusters": clusters,
        "cluster_sizes": sizes,
    }))
}
