//! Subcommand handlers

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use privacy_regions::{
    region_from_dp_composition_basic, region_from_dp_composition_exact, AdditiveMechanism,
    Compositor, ExponentialMedian, GaussianMechanism, GridConfig, HistogramQuery,
    LaplaceMechanism, MeanQuery, Mechanism, MedianQuery, RandomizedResponse, Rasterizer,
    RegionKind, Rendering,
};
use serde::Serialize;
use tracing::info;

use crate::preview;
use crate::scene::Scene;

/// Parse `key=value` into a parameter entry
pub fn parse_param(s: &str) -> Result<(String, f64)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got {:?}", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("parameter {:?} is not a number", key))?;
    Ok((key.trim().to_string(), value))
}

pub fn grid_config(resolution: usize, outline: Option<usize>) -> GridConfig {
    GridConfig::default()
        .with_resolution(resolution)
        .with_outline(outline)
}

// ============================================================================
// kinds
// ============================================================================

pub fn run_kinds() -> Result<()> {
    for kind in RegionKind::ALL {
        println!("{} {}", kind.key().green().bold(), kind.display_name().dimmed());
        for p in kind.params() {
            let mut notes = Vec::new();
            if p.integer {
                notes.push("integer");
            }
            if p.log_scale {
                notes.push("log scale");
            }
            println!(
                "    {:<14} {:<4} default {:<8} range [{}, {}] {}",
                p.key,
                p.symbol,
                p.default,
                p.min,
                p.max,
                notes.join(", ")
            );
        }
    }
    Ok(())
}

// ============================================================================
// render
// ============================================================================

/// JSON summary of a rendering
#[derive(Debug, Serialize)]
pub struct RenderSummary {
    pub title: String,
    pub resolution: usize,
    pub layers: Vec<LayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub id: usize,
    pub label: String,
    pub colour: String,
    pub area: f64,
}

impl From<&Rendering> for RenderSummary {
    fn from(rendering: &Rendering) -> Self {
        RenderSummary {
            title: rendering.title.clone(),
            resolution: rendering.resolution,
            layers: rendering
                .layers
                .iter()
                .map(|layer| LayerSummary {
                    id: layer.id,
                    label: layer.label.clone(),
                    colour: layer.colour.to_string(),
                    area: layer.mask.area(),
                })
                .collect(),
        }
    }
}

pub fn run_render(
    path: &Path,
    resolution: Option<usize>,
    outline: Option<usize>,
    width: usize,
    json: Option<&Path>,
) -> Result<()> {
    let mut scene = Scene::load(path)?;
    if let Some(resolution) = resolution {
        scene.grid = scene.grid.with_resolution(resolution);
    }
    if outline.is_some() {
        scene.grid = scene.grid.with_outline(outline);
    }

    let rendering = scene.render()?;
    preview::print(&rendering, width);

    if let Some(out) = json {
        let summary = RenderSummary::from(&rendering);
        let text = serde_json::to_string_pretty(&summary)?;
        std::fs::write(out, text)
            .with_context(|| format!("failed to write summary to {}", out.display()))?;
        info!(path = %out.display(), "wrote render summary");
        println!("\nSummary saved to: {}", out.display());
    }
    Ok(())
}

// ============================================================================
// region
// ============================================================================

pub fn run_region(
    kind: &str,
    params: &[(String, f64)],
    config: GridConfig,
    width: usize,
) -> Result<()> {
    let kind: RegionKind = kind.parse()?;
    let params: BTreeMap<String, f64> = params.iter().cloned().collect();
    let spec = kind.spec_with_defaults(&params)?;
    let label = spec.graph_label();

    let mut compositor = Compositor::new(config)?;
    compositor.add(spec.build()?, label.clone())?;
    let rendering = compositor.render(&label, None, true)?;
    preview::print(&rendering, width);
    Ok(())
}

// ============================================================================
// mechanism
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MechanismKind {
    Laplace,
    Gaussian,
    RandomizedResponse,
    Exponential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MechanismReport {
    pub name: &'static str,
    pub noise_scale: Option<f64>,
    pub variance: Option<f64>,
    pub tv: f64,
    pub exact_area: f64,
    pub tv_area: f64,
}

pub struct MechanismParams {
    pub epsilon: f64,
    pub delta: f64,
    pub sensitivity: f64,
    pub alphabet_size: usize,
}

fn report<M: Mechanism>(
    name: &'static str,
    mechanism: &M,
    noise: Option<(f64, f64)>,
    rasterizer: &Rasterizer,
) -> Result<MechanismReport> {
    Ok(MechanismReport {
        name,
        noise_scale: noise.map(|(scale, _)| scale),
        variance: noise.map(|(_, variance)| variance),
        tv: mechanism.tv(),
        exact_area: rasterizer.rasterize(&mechanism.region_exact())?.area(),
        tv_area: rasterizer.rasterize(&mechanism.region_tv())?.area(),
    })
}

pub fn mechanism_report(
    kind: MechanismKind,
    params: &MechanismParams,
    rasterizer: &Rasterizer,
) -> Result<MechanismReport> {
    match kind {
        MechanismKind::Laplace => {
            let m = LaplaceMechanism::new(params.epsilon, params.sensitivity)?;
            report("Laplace", &m, Some((m.noise_scale(), m.variance())), rasterizer)
        }
        MechanismKind::Gaussian => {
            let m = GaussianMechanism::new(params.epsilon, params.delta, params.sensitivity)?;
            report("Gaussian", &m, Some((m.noise_scale(), m.variance())), rasterizer)
        }
        MechanismKind::RandomizedResponse => {
            let m = RandomizedResponse::new(params.epsilon, params.alphabet_size)?;
            report("Randomized response", &m, None, rasterizer)
        }
        MechanismKind::Exponential => {
            let m = ExponentialMedian::new(params.epsilon, params.alphabet_size)?;
            report("Exponential (median)", &m, None, rasterizer)
        }
    }
}

pub fn run_mechanism(
    kind: MechanismKind,
    params: &MechanismParams,
    resolution: usize,
) -> Result<()> {
    let rasterizer = Rasterizer::new(grid_config(resolution, None))?;
    let r = mechanism_report(kind, params, &rasterizer)?;

    println!("{}", r.name.cyan().bold());
    println!("  ε = {}, δ = {}", params.epsilon, params.delta);
    if let (Some(scale), Some(variance)) = (r.noise_scale, r.variance) {
        println!("  noise scale     {:.6}", scale);
        println!("  noise variance  {:.6}", variance);
    }
    println!("  total variation {:.6}", r.tv);
    println!("  exact region    {:>6.2}%", 100.0 * r.exact_area);
    println!("  TV region       {:>6.2}%", 100.0 * r.tv_area);
    Ok(())
}

// ============================================================================
// sweep
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRow {
    pub k: u64,
    pub basic_area: f64,
    pub exact_area: f64,
}

pub fn sweep(
    epsilon: f64,
    delta: f64,
    max_k: u64,
    rasterizer: &Rasterizer,
) -> Result<Vec<SweepRow>> {
    (1..=max_k)
        .map(|k| {
            let basic = region_from_dp_composition_basic(epsilon, delta, k)?;
            let exact = region_from_dp_composition_exact(epsilon, delta, k)?;
            Ok(SweepRow {
                k,
                basic_area: rasterizer.rasterize(&basic)?.area(),
                exact_area: rasterizer.rasterize(&exact)?.area(),
            })
        })
        .collect()
}

pub fn run_sweep(epsilon: f64, delta: f64, max_k: u64, resolution: usize) -> Result<()> {
    let rasterizer = Rasterizer::new(grid_config(resolution, None))?;
    let rows = sweep(epsilon, delta, max_k, &rasterizer)?;

    println!(
        "{}",
        format!("Composition of (ε = {}, δ = {})-DP", epsilon, delta).bold()
    );
    println!("{:>5}  {:>10}  {:>10}", "k", "basic", "exact");
    for row in rows {
        println!(
            "{:>5}  {:>9.2}%  {:>9.2}%",
            row.k,
            100.0 * row.basic_area,
            100.0 * row.exact_area
        );
    }
    Ok(())
}

// ============================================================================
// utility
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryKind {
    Mean,
    Histogram,
    Median,
}

pub struct QueryParams {
    pub diameter: f64,
    pub size: usize,
    pub dimensions: usize,
    pub bins: usize,
    pub alphabet_size: usize,
    pub rank_deviation: f64,
}

/// Error proxy of a query privatized at (ε, δ)
pub fn query_utility(kind: QueryKind, params: &QueryParams, epsilon: f64, delta: f64) -> Result<f64> {
    let utility = match kind {
        QueryKind::Mean => MeanQuery::new(params.diameter, params.size, params.dimensions)?
            .utility(epsilon, delta)?,
        QueryKind::Histogram => HistogramQuery::new(params.bins)?.utility(epsilon)?,
        QueryKind::Median => MedianQuery::new(params.alphabet_size)?
            .utility(epsilon, params.rank_deviation)?,
    };
    Ok(utility)
}

pub fn run_utility(kind: QueryKind, params: &QueryParams, epsilons: &[f64], delta: f64) -> Result<()> {
    println!("{}", format!("{:?} query utility", kind).bold());
    println!("{:>10}  {:>14}", "ε", "utility");
    for &epsilon in epsilons {
        let utility = query_utility(kind, params, epsilon, delta)?;
        println!("{:>10}  {:>14.6}", epsilon, utility);
    }
    Ok(())
}
