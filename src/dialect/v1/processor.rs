//! Per-job file-value operations for v1 jobs
//!
//! Invoked at execution boundaries: path mapping before dispatch, file
//! discovery and output materialization after. Each call walks one
//! job's values with a fresh callback instance.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::Result;
use crate::model::FileDescriptor;
use crate::process::{
    self, ExpressionEvaluator, FileDiscovery, FilePathMapCallback, FilePathMapper,
    FileTransformer, FileUpdateCallback,
};

use super::document::PipelineJob;

/// Collect every file reachable from the job's inputs.
///
/// `visible_ports` restricts collection to the named (normalized)
/// ports; secondary files are derived from binding rules, using
/// `evaluator` for expression-form rules.
pub fn get_input_files(
    job: &PipelineJob,
    evaluator: Option<&dyn ExpressionEvaluator>,
    visible_ports: Option<FxHashSet<String>>,
) -> Result<FxHashSet<FileDescriptor>> {
    let mut discovery = FileDiscovery::new(evaluator, visible_ports, true);
    process::process(&job.inputs, job.app.inputs(), &mut discovery)?;
    let files = discovery.into_files();
    debug!(job_id = %job.id, files = files.len(), "collected input files");
    Ok(files)
}

/// Collect every file reachable from the job's outputs
pub fn get_output_files(
    job: &PipelineJob,
    evaluator: Option<&dyn ExpressionEvaluator>,
    visible_ports: Option<FxHashSet<String>>,
) -> Result<FxHashSet<FileDescriptor>> {
    let mut discovery = FileDiscovery::new(evaluator, visible_ports, true);
    process::process(&job.outputs, job.app.outputs(), &mut discovery)?;
    let files = discovery.into_files();
    debug!(job_id = %job.id, files = files.len(), "collected output files");
    Ok(files)
}

/// Rewrite every input file location through the mapper.
///
/// The job's own `config` mapping is handed to the mapper on each
/// call. Returns a new job; the argument is untouched.
pub fn map_input_paths(job: &PipelineJob, mapper: &dyn FilePathMapper) -> Result<PipelineJob> {
    let mut callback = FilePathMapCallback::new(mapper, job.config.clone());
    let inputs = process::process(&job.inputs, job.app.inputs(), &mut callback)?;
    Ok(job.clone_with_inputs(inputs))
}

/// Rewrite every output file location through the mapper
pub fn map_output_paths(job: &PipelineJob, mapper: &dyn FilePathMapper) -> Result<PipelineJob> {
    let mut callback = FilePathMapCallback::new(mapper, job.config.clone());
    let outputs = process::process(&job.outputs, job.app.outputs(), &mut callback)?;
    Ok(job.clone_with_outputs(outputs))
}

/// Replace every input file value through the transformer
pub fn update_input_files(
    job: &PipelineJob,
    transformer: &dyn FileTransformer,
) -> Result<PipelineJob> {
    let mut callback = FileUpdateCallback::new(transformer);
    let inputs = process::process(&job.inputs, job.app.inputs(), &mut callback)?;
    Ok(job.clone_with_inputs(inputs))
}

/// Replace every output file value through the transformer
pub fn update_output_files(
    job: &PipelineJob,
    transformer: &dyn FileTransformer,
) -> Result<PipelineJob> {
    let mut callback = FileUpdateCallback::new(transformer);
    let outputs = process::process(&job.outputs, job.app.outputs(), &mut callback)?;
    Ok(job.clone_with_outputs(outputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn job_with_files() -> PipelineJob {
        serde_yaml::from_str(
            r##"
id: sample
app:
  class: Tool
  inputs:
    - id: "#bam"
      type: File
      binding:
        secondaryFiles: ["^.bai"]
  outputs:
    - id: "#out"
      type: File
    - id: "#debug"
      type: File
inputs:
  bam:
    class: File
    path: /data/s.bam
outputs:
  out:
    class: File
    path: /work/result.txt
  debug:
    class: File
    path: /work/trace.log
config:
  volume: /mnt
"##,
        )
        .unwrap()
    }

    #[test]
    fn input_files_carry_derived_secondaries() {
        let files = get_input_files(&job_with_files(), None, None).unwrap();
        assert_eq!(files.len(), 1);
        let fd = files.iter().next().unwrap();
        assert_eq!(fd.path, "/data/s.bam");
        assert_eq!(fd.secondary_files[0].path, "/data/s.bai");
    }

    #[test]
    fn output_files_respect_visible_ports() {
        let visible = Some(["out".to_string()].into_iter().collect());
        let files = get_output_files(&job_with_files(), None, visible).unwrap();
        let paths: Vec<&str> = files.iter().map(|fd| fd.path.as_str()).collect();
        assert_eq!(paths, vec!["/work/result.txt"]);
    }

    #[test]
    fn map_input_paths_uses_job_config() {
        let job = job_with_files();
        let mapper = |path: &str, config: &Map<String, Value>| -> Result<String> {
            let volume = config["volume"].as_str().unwrap();
            Ok(format!("{volume}{path}"))
        };
        let mapped = map_input_paths(&job, &mapper).unwrap();
        assert_eq!(mapped.inputs["bam"]["path"], "/mnt/data/s.bam");
        // Original untouched
        assert_eq!(job.inputs["bam"]["path"], "/data/s.bam");
    }

    #[test]
    fn update_output_files_rebuilds_values() {
        let job = job_with_files();
        let finalize = |fd: FileDescriptor| -> Result<FileDescriptor> {
            let mut updated = fd.clone();
            updated.checksum = Some(format!("sha1${}", fd.path.len()));
            Ok(updated)
        };
        let updated = update_output_files(&job, &finalize).unwrap();
        assert_eq!(
            updated.outputs["out"],
            json!({
                "class": "File",
                "path": "/work/result.txt",
                "checksum": "sha1$16"
            })
        );
    }
}
