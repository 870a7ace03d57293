//! Maps the wizard UI's request paths onto service calls. HTTP framing and
//! access control are left to the caller.

use std::path::{Path, PathBuf};

use manifx_render::{OutputFormat, RenderError};

use crate::{ManifestService, ServiceError};

const XML_CONTENT_TYPE: &str = "application/xml";

/// The outcome of a wizard request.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStatus {
  Ok,
  NotFound,
}

impl WizardStatus {
  /// The HTTP status code for the response.
  ///
  pub fn code(self) -> u16 {
    match self {
      WizardStatus::Ok => 200,
      WizardStatus::NotFound => 404,
    }
  }
}

/// A response to a wizard request. When `file_name` is set the body is
/// intended to be downloaded under that name.
///
#[derive(Clone, Debug, PartialEq)]
pub struct WizardResponse {
  pub status: WizardStatus,
  pub content_type: &'static str,
  pub file_name: Option<String>,
  pub body: Vec<u8>,
}

impl WizardResponse {
  fn xml(body: impl Into<String>) -> Self {
    Self {
      status: WizardStatus::Ok,
      content_type: XML_CONTENT_TYPE,
      file_name: None,
      body: body.into().into_bytes(),
    }
  }

  fn ok() -> Self {
    Self::xml("<OK/>")
  }

  fn not_ok() -> Self {
    Self::xml("<NOTOK/>")
  }

  fn unable() -> Self {
    Self::xml("<UNABLE/>")
  }

  fn not_found() -> Self {
    Self {
      status: WizardStatus::NotFound,
      content_type: "text/plain",
      file_name: None,
      body: vec![],
    }
  }

  fn download(
    format: OutputFormat,
    file_name: String,
    rendered: Result<Vec<u8>, RenderError>,
  ) -> Self {
    match rendered {
      Ok(body) => Self {
        status: WizardStatus::Ok,
        content_type: format.content_type(),
        file_name: Some(file_name),
        body,
      },

      Err(e) => {
        tracing::warn!(
          file_name = %file_name,
          error = %e,
          "Unable to render manifest"
        );
        Self::unable()
      }
    }
  }

  /// The body as text, for XML responses.
  ///
  pub fn text(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }
}

/// Handles a wizard request, e.g. `"listExportManifest/csv"`. The first path
/// segment names the function, and any further segments are its arguments.
/// Unknown functions and arguments produce a not found response.
///
pub fn handle(service: &ManifestService, path: &str) -> WizardResponse {
  let segments: Vec<&str> =
    path.split('/').filter(|segment| !segment.is_empty()).collect();

  match segments.as_slice() {
    ["listImportManifest", extension] => {
      let Some(format) = OutputFormat::from_extension(extension) else {
        return WizardResponse::not_found();
      };

      WizardResponse::download(
        format,
        format!("ImportManifest.{format}"),
        service.render_import(format),
      )
    }

    ["listLocalManifest", extension] => {
      let Some(format) = OutputFormat::from_extension(extension) else {
        return WizardResponse::not_found();
      };

      WizardResponse::download(
        format,
        format!("LocalManifest.{format}"),
        service.render_manifest(format, true),
      )
    }

    ["listExportManifest", extension] => {
      let Some(format) = OutputFormat::from_extension(extension) else {
        return WizardResponse::not_found();
      };

      WizardResponse::download(
        format,
        format!("ExportManifest.{format}"),
        service.render_manifest(format, false),
      )
    }

    ["listHistory", rest @ ..] => {
      let include_phi = rest.first() == Some(&"phi");

      let file_name = if include_phi {
        "History(PHI).xlsx"
      } else {
        "History.xlsx"
      };

      WizardResponse::download(
        OutputFormat::Xlsx,
        file_name.to_string(),
        service.render_history(OutputFormat::Xlsx, include_phi, true),
      )
    }

    ["getExportManifestStatus"] => {
      WizardResponse::xml(service.status().to_xml())
    }

    ["initializeAnonymizerPipelineCounts"] => {
      WizardResponse::xml(service.initialize_counts().to_xml())
    }

    ["getImportManifestInstanceCount"] => WizardResponse::xml(format!(
      "<status instanceCount=\"{}\"/>",
      service.import_instance_count()
    )),

    ["clearExportManifest"] => {
      service.clear();
      WizardResponse::ok()
    }

    ["reset"] => {
      service.clear();
      service.clear_import();
      service.initialize_counts();
      WizardResponse::ok()
    }

    ["resetHistory"] => {
      service.clear_history();
      WizardResponse::ok()
    }

    ["exportManifest"] => write_export(service, |service, directory| {
      service.write_export_manifest(directory)
    }),

    ["exportHistory"] => write_export(service, |service, directory| {
      service.write_export_history(directory)
    }),

    _ => WizardResponse::not_found(),
  }
}

fn write_export(
  service: &ManifestService,
  write: impl FnOnce(&ManifestService, &Path) -> Result<PathBuf, ServiceError>,
) -> WizardResponse {
  let Some(directory) = service.export_directory() else {
    tracing::warn!("No export directory is configured");
    return WizardResponse::not_ok();
  };

  match write(service, directory) {
    Ok(_) => WizardResponse::ok(),
    Err(e) => {
      tracing::warn!(error = %e, "Unable to write export file");
      WizardResponse::not_ok()
    }
  }
}
