use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, ValueEnum};

use lipid_forge::ops::{
    DirectionEstimator, HeadTailEstimator, OrientationPlan, PrincipalAxisEstimator, Repositioner,
};
use lipid_forge::{Structure, Vector};

use crate::commands::{format_vector, parse_vector, run_with_spinner};

/// Strategy used when the current direction is not given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EstimatorKind {
    /// Head atom (N, then P) toward the two most distant atoms.
    #[value(name = "head-tail")]
    HeadTail,
    /// Largest-variance axis through the geometric center.
    #[value(name = "principal")]
    Principal,
}

/// Rigidly rotates the structure, or each residue, toward a target direction.
#[derive(Debug, Args)]
pub struct RepositionArgs {
    /// Target direction as X,Y,Z.
    #[arg(
        long,
        value_name = "X,Y,Z",
        value_parser = parse_vector,
        allow_hyphen_values = true,
        required_unless_present = "plan",
        conflicts_with = "plan"
    )]
    pub to: Option<Vector>,
    /// Serial of the pivot atom; defaults to the estimator's pivot.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "plan")]
    pub root: Option<i32>,
    /// Current direction as X,Y,Z; estimated when omitted.
    #[arg(
        long,
        value_name = "X,Y,Z",
        value_parser = parse_vector,
        allow_hyphen_values = true,
        conflicts_with = "plan"
    )]
    pub from: Option<Vector>,
    /// Direction estimator.
    #[arg(long, value_enum, default_value_t = EstimatorKind::HeadTail)]
    pub estimator: EstimatorKind,
    /// TOML file with per-residue targets; switches to per-residue mode.
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,
}

/// Repositions the structure and returns it with the `REMARK` lines describing the move.
pub fn run(structure: &Structure, args: &RepositionArgs) -> Result<(Structure, Vec<String>)> {
    let estimator: Box<dyn DirectionEstimator> = match args.estimator {
        EstimatorKind::HeadTail => Box::new(HeadTailEstimator::new()),
        EstimatorKind::Principal => Box::new(PrincipalAxisEstimator),
    };
    let repositioner = Repositioner::with_estimator(estimator);

    if let Some(plan_path) = &args.plan {
        let content = fs::read_to_string(plan_path)
            .with_context(|| format!("Failed to read plan file {}", plan_path.display()))?;
        let plan = OrientationPlan::from_toml_str(&content)
            .with_context(|| format!("Failed to load plan file {}", plan_path.display()))?;

        let moved = run_with_spinner("Repositioning residues", || {
            Ok(repositioner.reposition_residues(structure, &plan))
        })?;

        let remarks = vec![
            "Generated by residue-based lipid repositioning".to_string(),
            format!(
                "{} residues, {} explicit targets, default {}",
                structure.residue_count(),
                plan.len(),
                format_vector(&plan.default_target())
            ),
        ];
        return Ok((moved, remarks));
    }

    let to = args
        .to
        .ok_or_else(|| anyhow!("--to is required unless --plan is given"))?;

    run_with_spinner("Repositioning structure", || {
        let (moved, pivot_label, from) = match (args.root, args.from) {
            (Some(root), from) => {
                let from = match from {
                    Some(from) => from,
                    None => repositioner
                        .estimator()
                        .estimate(structure.atoms())
                        .context("Failed to estimate the current direction")?
                        .direction,
                };
                let moved = repositioner
                    .reposition_about(structure, root, Some(from), &to)
                    .with_context(|| format!("Failed to reposition about atom {}", root))?;
                (moved, format!("atom {}", root), from)
            }
            (None, from) => {
                let orientation = repositioner
                    .estimator()
                    .estimate(structure.atoms())
                    .context("Failed to estimate the orientation")?;
                let from = from.unwrap_or(orientation.direction);
                let moved = Repositioner::reposition(
                    structure,
                    &orientation.pivot,
                    &from,
                    &to,
                );
                let label = match orientation.head {
                    Some(serial) => format!("atom {}", serial),
                    None => format!("point {}", format_vector(&orientation.pivot.coords)),
                };
                (moved, label, from)
            }
        };

        log::info!(
            "Rotated {} atoms about {} from {} to {}",
            moved.atom_count(),
            pivot_label,
            format_vector(&from),
            format_vector(&to)
        );

        let remarks = vec![
            "Generated by lipid repositioning".to_string(),
            format!(
                "pivot {}, direction {} aligned to {}",
                pivot_label,
                format_vector(&from),
                format_vector(&to)
            ),
        ];
        Ok((moved, remarks))
    })
}
