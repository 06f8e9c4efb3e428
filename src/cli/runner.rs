use tracing::info;
use tracing_subscriber::EnvFilter;

use seamask::api::{ScenePair, preprocess_worldcover_dir, process_scene, process_scenes};
use seamask::{LandClassSet, MaskingParams, SceneOutcome};

use super::args::CliArgs;
use super::errors::AppError;

/// Assemble effective parameters: defaults, then the params file, then
/// explicit flags.
fn build_params(args: &CliArgs) -> Result<MaskingParams, AppError> {
    let mut params = match &args.params {
        Some(path) => MaskingParams::from_json_file(path)?,
        None => MaskingParams::default(),
    };

    if let Some(dir) = &args.worldcover_dir {
        params.worldcover_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        params.output_dir = dir.clone();
    }
    if let Some(variant) = args.tile_variant {
        params.tile_variant = variant;
    }
    if args.keep_sea_ice {
        params.land_classes = LandClassSet::keeping_sea_ice();
    }
    if let Some(iterations) = args.coastline_dilation {
        params.coastline_dilation = iterations;
    }
    if args.no_cleanup {
        params.mask_cleanup = false;
    }
    Ok(params)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let params = build_params(&args)?;

    if let Some(input_dir) = &args.preprocess_from {
        info!(
            "Preprocessing WorldCover tiles: {} -> {}",
            input_dir.display(),
            params.worldcover_dir.display()
        );
        let count = preprocess_worldcover_dir(input_dir, &params.worldcover_dir)?;
        info!("Preprocessed {} tile(s)", count);
        return Ok(());
    }

    match (&args.hh, &args.hv, &args.scenes) {
        (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => Err(AppError::ConflictingModes.into()),
        (_, _, Some(scenes_path)) => {
            let pairs = ScenePair::load_list(scenes_path)?;
            info!("Starting batch run over {} scene(s)", pairs.len());
            let report = process_scenes(&pairs, &params, args.keep_going)?;
            if report.errors > 0 {
                return Err(format!("{} scene(s) failed", report.errors).into());
            }
            Ok(())
        }
        (Some(hh), Some(hv), None) => {
            match process_scene(hh, hv, &params)? {
                SceneOutcome::Masked(scene) => {
                    info!(
                        "Successfully masked: {} -> {}, {}",
                        scene.bounds,
                        scene.hh_output.display(),
                        scene.hv_output.display()
                    );
                    Ok(())
                }
                SceneOutcome::Skipped(reason) => Err(format!("scene skipped: {}", reason).into()),
            }
        }
        (None, _, None) => Err(AppError::MissingArgument {
            arg: "--hh".to_string(),
        }
        .into()),
        (_, None, None) => Err(AppError::MissingArgument {
            arg: "--hv".to_string(),
        }
        .into()),
    }
}
