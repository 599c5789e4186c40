mod fetch;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use tsw_core::config::{self, ArgumentForm, CONFIG_FILE_NAME, TargetConfig};
use tsw_core::ir::{ApiDocument, SchemaKind};
use tsw_core::parse::{self, spec::RawSpec};
use tsw_core::transform;
use tsw_core::{CodeGenerator, GeneratedFile};
use tsw_nuxt_plugin::{NuxtPluginConfig, NuxtPluginGenerator};

use crate::fetch::fetch_spec;

const PACKAGE_JSON: &str = "package.json";

#[derive(Parser)]
#[command(
    name = "tsw",
    about = "Swagger 2.0 / OpenAPI 3.x to typed Nuxt axios plugin generator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate plugin and type definition modules
    Generate(GenerateArgs),

    /// Check that a document parses and converts
    Validate {
        /// Spec file path or URL
        src: String,
    },

    /// Print a summary of the canonical form of a document
    Inspect {
        /// Spec file path or URL
        src: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a starter tsw.yaml
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Spec file path or URL
    src: Option<String>,

    /// Directory the plugin is written to
    #[arg(long)]
    plugins_dir: Option<String>,

    /// Plugin file name
    #[arg(long)]
    plugin_name: Option<String>,

    /// Accessor name, injected as `$<inject>`
    #[arg(long)]
    inject: Option<String>,

    /// Path of the type definitions file
    #[arg(long)]
    type_path: Option<String>,

    /// Prefix stripped from paths before building the accessor tree
    #[arg(long)]
    base_path: Option<String>,

    /// Drop header parameters
    #[arg(long)]
    skip_header: bool,

    /// How call arguments are arranged
    #[arg(long)]
    form: Option<FormArg>,

    /// Create a per-plugin axios instance from runtime config
    #[arg(long)]
    axios_config: bool,
}

impl GenerateArgs {
    /// Command-line values as a partial target; unset flags stay unset so
    /// config files can supply them.
    fn target(&self) -> TargetConfig {
        TargetConfig {
            src: self.src.clone(),
            plugins_dir: self.plugins_dir.clone(),
            plugin_name: self.plugin_name.clone(),
            inject: self.inject.clone(),
            type_path: self.type_path.clone(),
            base_path: self.base_path.clone(),
            skip_header: self.skip_header.then_some(true),
            form: self.form.map(ArgumentForm::from),
            axios_config: self.axios_config.then_some(true),
            thresholds: None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormArg {
    Default,
    Underscore,
}

impl From<FormArg> for ArgumentForm {
    fn from(form: FormArg) -> Self {
        match form {
            FormArg::Default => ArgumentForm::Default,
            FormArg::Underscore => ArgumentForm::Underscore,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args).await,

        Commands::Validate { src } => cmd_validate(&src).await,

        Commands::Inspect { src, format } => cmd_inspect(&src, format).await,

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "tsw", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn load_document(src: &str) -> Result<ApiDocument> {
    let content = fetch_spec(src).await?;
    let raw = parse::from_str(&content).with_context(|| format!("failed to parse {src}"))?;
    Ok(transform::transform(&raw))
}

/// Write generated files under `base`, creating directories as needed.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  create {}", path.display());
    }
    Ok(())
}

fn generator_config(target: &config::ResolvedTarget) -> NuxtPluginConfig {
    NuxtPluginConfig {
        options: target.generate_options(),
        plugin_path: target.plugin_path().display().to_string(),
        type_path: target.type_path.display().to_string(),
    }
}

async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let file_targets = config::load_config(Path::new(CONFIG_FILE_NAME))?
        .map(|cfg| cfg.targets)
        .unwrap_or_default();
    let package = config::load_package_target(Path::new(PACKAGE_JSON))?;
    let targets = config::merge_targets(&args.target(), &file_targets, package.as_ref());

    for target in targets {
        let target = target.resolve()?;
        eprintln!("Generating {} from {}", target.plugin_name, target.src);
        // Each target converts its own copy of the document.
        let document = load_document(&target.src).await?;
        let files = NuxtPluginGenerator.generate(&document, &generator_config(&target))?;
        write_files(Path::new("."), &files)?;
    }
    Ok(())
}

async fn cmd_validate(src: &str) -> Result<()> {
    let content = fetch_spec(src).await?;
    let raw = parse::from_str(&content).with_context(|| format!("failed to parse {src}"))?;

    let info = raw.info();
    let dialect = match &raw {
        RawSpec::Swagger2(_) => "Swagger",
        RawSpec::OpenApi3(_) => "OpenAPI",
    };
    eprintln!("Valid {dialect} {} document: {}", raw.version(), info.title);
    eprintln!("  Version: {}", info.version);

    let document = transform::transform(&raw);
    eprintln!("  Operations: {}", document.operations.len());
    eprintln!("  Schemas: {}", document.schemas.len());

    eprintln!("Validation successful.");
    Ok(())
}

async fn cmd_inspect(src: &str, format: InspectFormat) -> Result<()> {
    let document = load_document(src).await?;
    let summary = build_inspect_summary(&document);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn schema_kind(kind: &SchemaKind) -> &'static str {
    match kind {
        SchemaKind::Ref(_) => "ref",
        SchemaKind::Enum(_) => "enum",
        SchemaKind::Array(_) => "array",
        SchemaKind::Object(_) => "object",
        SchemaKind::Composition { .. } => "composition",
        SchemaKind::Primitive { .. } => "primitive",
        SchemaKind::File => "file",
        SchemaKind::Any => "any",
    }
}

fn build_inspect_summary(document: &ApiDocument) -> serde_json::Value {
    let schemas: Vec<serde_json::Value> = document
        .schemas
        .iter()
        .map(|(name, schema)| {
            serde_json::json!({
                "name": name,
                "kind": schema_kind(&schema.kind),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = document
        .operations
        .iter()
        .map(|op| {
            let parameters: Vec<serde_json::Value> = op
                .parameters
                .iter()
                .map(|p| serde_json::json!({ "name": p.name, "in": p.location.as_str() }))
                .collect();
            serde_json::json!({
                "method": op.method.as_str(),
                "path": op.path,
                "parameters": parameters,
                "request_body": op.request_body.is_some(),
                "multipart": op.is_multipart(),
                "responses": op.responses.keys().collect::<Vec<_>>(),
                "deprecated": op.deprecated,
            })
        })
        .collect();

    serde_json::json!({
        "version": document.version.as_str(),
        "info": {
            "title": document.info.title,
            "version": document.info.version,
        },
        "schemas": schemas,
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use tsw_core::ir::{ApiInfo, HttpMethod, Operation, Schema, SpecVersion};

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags_become_partial_target() {
        let cli = Cli::try_parse_from([
            "tsw",
            "generate",
            "swagger.json",
            "--plugin-name",
            "backend",
            "--form",
            "underscore",
            "--skip-header",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let target = args.target();
        assert_eq!(target.src.as_deref(), Some("swagger.json"));
        assert_eq!(target.plugin_name.as_deref(), Some("backend"));
        assert_eq!(target.form, Some(ArgumentForm::Underscore));
        assert_eq!(target.skip_header, Some(true));
        assert_eq!(target.axios_config, None);
        assert_eq!(target.base_path, None);
    }

    #[test]
    fn test_generator_config_paths() {
        let target = TargetConfig {
            src: Some("api.json".into()),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        let config = generator_config(&target);
        assert_eq!(
            Path::new(&config.plugin_path),
            Path::new("plugins").join("api").join("index.ts")
        );
        assert_eq!(
            Path::new(&config.type_path),
            Path::new("plugins").join("api").join("types.ts")
        );
        assert_eq!(config.options.rel_type_path, "./types");
    }

    #[test]
    fn test_write_files_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![GeneratedFile {
            path: "plugins/api/index.ts".into(),
            content: "export {}\n".into(),
        }];
        write_files(dir.path(), &files).unwrap();
        let written = fs::read_to_string(dir.path().join("plugins/api/index.ts")).unwrap();
        assert_eq!(written, "export {}\n");
    }

    #[test]
    fn test_inspect_summary() {
        let mut op = Operation::new("/pets", HttpMethod::Get);
        op.responses.insert("200".into(), Default::default());
        let document = ApiDocument {
            version: SpecVersion::OpenApi3,
            info: ApiInfo {
                title: "Pets".into(),
                version: "1.0".into(),
                description: None,
            },
            schemas: [("Pet".to_string(), Schema::any())].into_iter().collect(),
            operations: vec![op],
        };
        let summary = build_inspect_summary(&document);
        assert_eq!(summary["version"], "openapi 3");
        assert_eq!(summary["info"]["title"], "Pets");
        assert_eq!(summary["schemas"][0]["kind"], "any");
        assert_eq!(summary["operations"][0]["method"], "get");
        assert_eq!(summary["operations"][0]["responses"][0], "200");
    }
}
