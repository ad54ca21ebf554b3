use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use controller_codegen::{
    Crd,
    codegen::{self, compare_resource},
    config::{self, FlavorConfig, FlavorName, GeneratorConfig},
    model::{self, ResourceDefinition},
};
use snafu::{ResultExt, Snafu, ensure};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to load generator config"))]
    LoadConfig { source: config::Error },

    #[snafu(display("failed to read resource definition from {path}", path = path.display()))]
    ReadDefinition { source: io::Error, path: PathBuf },

    #[snafu(display("failed to parse resource definition from {path}", path = path.display()))]
    ParseDefinition {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to build resource model of {resource:?}"))]
    BuildModel {
        source: model::BuildError,
        resource: String,
    },

    #[snafu(display("failed to generate comparison of {resource:?}"))]
    Generate {
        source: codegen::GenerationError,
        resource: String,
    },

    #[snafu(display("failed to write fragment to stdout"))]
    WriteFragment { source: io::Error },

    #[snafu(display("{failed} of {total} resources failed"))]
    ResourcesFailed { failed: usize, total: usize },
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, clap::Args)]
pub struct CompareArguments {
    /// Generator config with the flavor and per-resource overrides.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Overrides the flavor selected in the generator config.
    #[arg(long, short)]
    flavor: Option<FlavorName>,

    /// Name of the difference collector.
    #[arg(long, default_value = "delta")]
    delta: String,

    /// Expression of the left-hand resource.
    #[arg(long, default_value = "a.ko")]
    left: String,

    /// Expression of the right-hand resource.
    #[arg(long, default_value = "b.ko")]
    right: String,

    /// Number of tab stops the fragment is indented by.
    #[arg(long, default_value_t = 1)]
    indent: usize,

    /// Resource definition files.
    #[arg(required = true)]
    definitions: Vec<PathBuf>,
}

pub fn run(arguments: &CompareArguments) -> Result<()> {
    let config = match &arguments.config {
        Some(path) => GeneratorConfig::from_file(path).context(LoadConfigSnafu)?,
        None => GeneratorConfig::default(),
    };

    let flavor = arguments
        .flavor
        .map_or_else(|| config.flavor(), FlavorConfig::from);

    let mut stdout = io::stdout().lock();
    let mut failed = 0usize;

    for path in &arguments.definitions {
        match generate(arguments, &config, &flavor, path) {
            Ok(fragment) => stdout
                .write_all(fragment.as_bytes())
                .context(WriteFragmentSnafu)?,
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = &err as &dyn std::error::Error,
                    "skipping resource definition"
                );
                failed += 1;
            }
        }
    }

    ensure!(
        failed == 0,
        ResourcesFailedSnafu {
            failed,
            total: arguments.definitions.len(),
        }
    );

    Ok(())
}

fn generate(
    arguments: &CompareArguments,
    config: &GeneratorConfig,
    flavor: &FlavorConfig,
    path: &Path,
) -> Result<String> {
    let input = fs::read_to_string(path).context(ReadDefinitionSnafu { path })?;
    let definition =
        ResourceDefinition::from_yaml_str(&input).context(ParseDefinitionSnafu { path })?;

    let crd = Crd::try_new(
        &definition,
        config.resource(&definition.name),
        flavor.clone(),
    )
    .context(BuildModelSnafu {
        resource: &definition.name,
    })?;

    tracing::info!(resource = %crd.name(), path = %path.display(), "generating comparison");

    compare_resource(
        flavor,
        &crd,
        &arguments.delta,
        &arguments.left,
        &arguments.right,
        arguments.indent,
    )
    .context(GenerateSnafu {
        resource: crd.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments(definitions: Vec<PathBuf>) -> CompareArguments {
        CompareArguments {
            config: None,
            flavor: None,
            delta: "delta".to_owned(),
            left: "a.ko".to_owned(),
            right: "b.ko".to_owned(),
            indent: 1,
            definitions,
        }
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../controller-codegen/fixtures/inputs")
            .join(name)
    }

    #[test]
    fn failed_resources_are_counted() {
        let arguments = arguments(vec![
            fixture("s3_bucket.yaml"),
            fixture("missing.yaml"),
            fixture("lambda_function.yaml"),
        ]);

        let err = run(&arguments).expect_err("missing definition must fail the run");

        assert!(matches!(err, Error::ResourcesFailed {
            failed: 1,
            total: 3
        }));
    }

    #[test]
    fn generate_single_resource() {
        let arguments = arguments(vec![fixture("lambda_code_signing_config.yaml")]);
        let config = GeneratorConfig::default();

        let fragment = generate(
            &arguments,
            &config,
            &FlavorConfig::crossplane(),
            &arguments.definitions[0],
        )
        .expect("fragment must generate");

        assert!(fragment.starts_with('\n'));
        assert!(fragment.contains("delta.Add(\"Spec.ForProvider.Description\""));
    }
}
