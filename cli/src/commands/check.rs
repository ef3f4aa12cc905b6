//! `tokengate check`

use std::process::ExitCode;

use serde_json::json;
use tg_shared::config::{AppConfig, ConfigErrors};

use crate::{install, reject};

pub fn run(validated: Result<AppConfig, ConfigErrors>, as_json: bool) -> anyhow::Result<ExitCode> {
    let config = match validated {
        Ok(config) => install(config)?,
        Err(errors) if as_json => {
            let report = json!({
                "valid": false,
                "errors": errors.to_field_errors(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(ExitCode::FAILURE);
        }
        Err(errors) => return Ok(reject(&errors)),
    };

    tracing::info!(environment = %config.environment, "Configuration valid");

    if as_json {
        let report = json!({
            "valid": true,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("configuration ok");
        println!("  environment      {}", config.environment);
        println!("  port             {}", config.port);
        println!("  access expires   {}", config.jwt.access_expires);
        println!("  refresh expires  {}", config.jwt.refresh_expires);
        println!("  datastore        {}", config.datastore.redacted_uri());
    }

    Ok(ExitCode::SUCCESS)
}
