mod logging;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use scm_wizard_config::{
  FormConfig, FormMode, ParameterDef, SubscriptionModel, WizardSettings, ids,
};
use scm_wizard_http::{HttpScmClient, ScmClient};
use scm_wizard_plugin::{FeatureLink, SubscriptionForm, search_groups, search_repositories};
use scm_wizard_registry::Control;

/// scm-wizard - Configure and validate SCM subscription parameters
#[derive(Parser)]
#[command(name = "scm-wizard")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the settings file (default: ~/.scm-wizard/settings.json)
  #[arg(long, global = true)]
  settings: Option<PathBuf>,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Compute a repository identifier and check it is available
  Check {
    /// Tool type, e.g. git or svn
    #[arg(long = "type")]
    service_type: String,

    /// Node identifier
    #[arg(long)]
    node: String,

    /// Package key of the project
    #[arg(long)]
    pkey: String,

    /// Project name
    #[arg(long)]
    project: String,

    /// Subscription model id
    #[arg(long, default_value_t = 0)]
    model_id: u32,
  },

  /// Search existing repositories of a node
  Repositories {
    #[arg(long = "type")]
    service_type: String,

    #[arg(long)]
    node: String,

    /// Search criteria
    criteria: String,
  },

  /// Search groups available to a subscription
  Groups {
    /// Subscription model id
    #[arg(long)]
    model_id: u32,

    #[arg(long)]
    node: String,

    /// Search term
    term: String,
  },

  /// Print the link to a subscribed repository
  Link {
    #[arg(long = "type")]
    service_type: String,

    /// Subscription parameter, e.g. service:scm:git:url=https://scm.example.com
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  logging::init_logging(cli.verbose)?;

  let Some(command) = cli.command else {
    println!("scm-wizard - use --help to see available commands");
    return Ok(());
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    let settings = load_settings(cli.settings.as_deref()).await?;
    run(command, settings).await
  })
}

async fn run(command: Commands, settings: WizardSettings) -> Result<()> {
  match command {
    Commands::Check {
      service_type,
      node,
      pkey,
      project,
      model_id,
    } => {
      let client = http_client(&settings)?;
      check(client, &settings, service_type, node, pkey, project, model_id).await
    }
    Commands::Repositories {
      service_type,
      node,
      criteria,
    } => {
      let client = http_client(&settings)?;
      let form = FormConfig::new(FormMode::Link, service_type, node);
      let results = search_repositories(client.as_ref(), &form, &criteria)
        .await
        .context("repository search failed")?;
      print_json(&results)
    }
    Commands::Groups {
      model_id,
      node,
      term,
    } => {
      let client = http_client(&settings)?;
      groups(client, &settings, model_id, node, term).await
    }
    Commands::Link {
      service_type,
      params,
    } => {
      let parameters: HashMap<String, String> = params.into_iter().collect();
      let link = FeatureLink::from_parameters(&service_type, &parameters, &settings.messages)
        .with_context(|| {
          format!(
            "both {} and {} are required",
            ids::typed(&service_type, "url"),
            ids::typed(&service_type, "repository")
          )
        })?;
      print_json(&link)
    }
  }
}

async fn check(
  client: Arc<dyn ScmClient>,
  settings: &WizardSettings,
  service_type: String,
  node: String,
  pkey: String,
  project: String,
  model_id: u32,
) -> Result<()> {
  let parameters = [
    ParameterDef::new(ids::OU).mandatory(),
    ParameterDef::new(ids::PROJECT).mandatory(),
    ParameterDef::new(ids::REPOSITORY),
  ];
  let mut form = SubscriptionForm::open(
    FormConfig::new(FormMode::Create, service_type, node),
    SubscriptionModel { id: model_id, pkey },
    &parameters,
    client,
    settings,
  );

  let permitted = form.change(ids::PROJECT, &project)?;
  debug!(permitted, "project applied");

  let state = form.settled().await;
  print_json(&state)?;

  let outcome = form.submit();
  form.close();
  match outcome {
    Ok(values) => {
      info!(repository = ?values.get(ids::REPOSITORY), "repository identifier accepted");
      Ok(())
    }
    Err(e) => Err(e.into()),
  }
}

async fn groups(
  client: Arc<dyn ScmClient>,
  settings: &WizardSettings,
  model_id: u32,
  node: String,
  term: String,
) -> Result<()> {
  let model = SubscriptionModel {
    id: model_id,
    pkey: String::new(),
  };
  let form = SubscriptionForm::open(
    FormConfig::new(FormMode::Link, "", node),
    model.clone(),
    &[ParameterDef::new(ids::LDAP_GROUPS)],
    client.clone(),
    settings,
  );

  let control = form.form().field(ids::LDAP_GROUPS).map(|f| f.control.clone());
  let Some(Control::MultiSelect(options)) = control else {
    bail!("group parameter is not a multi-select");
  };
  let results = search_groups(client.as_ref(), &model, &options, &term)
    .await
    .context("group search failed")?;
  form.close();
  print_json(&results)
}

fn http_client(settings: &WizardSettings) -> Result<Arc<dyn ScmClient>> {
  let client = HttpScmClient::from_settings(settings)
    .with_context(|| format!("invalid base URL: {}", settings.base_url))?;
  Ok(Arc::new(client))
}

/// Read the settings file. A missing file yields the defaults.
async fn load_settings(path: Option<&Path>) -> Result<WizardSettings> {
  let path = match path {
    Some(path) => path.to_path_buf(),
    None => dirs::home_dir()
      .ok_or_else(|| anyhow!("could not determine home directory"))?
      .join(".scm-wizard")
      .join("settings.json"),
  };

  let content = match tokio::fs::read_to_string(&path).await {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(path = %path.display(), "no settings file, using defaults");
      return Ok(WizardSettings::default());
    }
    Err(e) => {
      return Err(e).with_context(|| format!("failed to read settings file: {}", path.display()));
    }
  };

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse settings file: {}", path.display()))
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
  raw
    .split_once('=')
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
