//! Batch driver: load a project, force-resolve it, collect a report.

use anyhow::{Context, Result};
use lazyres_common::{Diagnostic, FqName};
use lazyres_resolve::{
    ClassId, Container, Descriptor, ResolveOptions, ResolveSession, render_descriptor,
};
use lazyres_syntax::Project;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct DriverOptions {
    pub resolve: ResolveOptions,
    /// Force top-level classes of each package on the rayon pool.
    pub parallel: bool,
    /// Include the builtins package in the report.
    pub include_builtins: bool,
}

/// Everything one run produced.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub packages: Vec<PackageReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolveReport {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct PackageReport {
    pub name: String,
    pub declarations: Vec<DeclarationReport>,
}

/// One rendered descriptor. Classes carry their members, nested classes and
/// class object included.
#[derive(Debug, Serialize)]
pub struct DeclarationReport {
    pub signature: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<DeclarationReport>,
}

pub fn resolve_file(path: &Path, options: &DriverOptions) -> Result<ResolveReport> {
    let project =
        Project::load(path).with_context(|| format!("failed to load project {}", path.display()))?;
    resolve_project(project, options)
}

pub fn resolve_project(project: Project, options: &DriverOptions) -> Result<ResolveReport> {
    let started = Instant::now();
    let builtins = FqName::new(&options.resolve.builtins_package);
    let mut packages = project.packages();
    if options.include_builtins && options.resolve.inject_builtins && !packages.contains(&builtins) {
        packages.push(builtins.clone());
    }
    let session = ResolveSession::new(project, options.resolve.clone());

    let mut reports = Vec::with_capacity(packages.len());
    for fq_name in &packages {
        if *fq_name == builtins && !options.include_builtins {
            continue;
        }
        let Some(package) = session.package(fq_name)? else {
            continue;
        };
        if options.parallel {
            force_parallel(&session, Container::Package(package))?;
        }
        session
            .force_resolve_package(package)
            .with_context(|| format!("failed to resolve package {fq_name}"))?;
        reports.push(PackageReport {
            name: fq_name.to_string(),
            declarations: render_members(&session, Container::Package(package))?,
        });
    }

    let diagnostics = session.diagnostics();
    info!(
        packages = reports.len(),
        classes = session.class_count(),
        diagnostics = diagnostics.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "resolution finished"
    );
    Ok(ResolveReport {
        packages: reports,
        diagnostics,
    })
}

/// Force each top-level class on its own rayon task. Lazy values guarantee
/// every part is still computed once.
fn force_parallel(session: &ResolveSession, container: Container) -> Result<()> {
    let classes: Vec<ClassId> = session
        .resolve_all_members(container)?
        .into_iter()
        .filter_map(|member| match member {
            Descriptor::Class(id) => Some(id),
            Descriptor::Callable(_) => None,
        })
        .collect();
    debug!(classes = classes.len(), "forcing classes in parallel");
    classes
        .par_iter()
        .try_for_each(|class| session.force_resolve_all(&Descriptor::Class(*class)))?;
    Ok(())
}

fn render_members(session: &ResolveSession, container: Container) -> Result<Vec<DeclarationReport>> {
    session
        .resolve_all_members(container)?
        .iter()
        .map(|member| render_member(session, member))
        .collect()
}

fn render_member(session: &ResolveSession, member: &Descriptor) -> Result<DeclarationReport> {
    let signature = render_descriptor(session, member)?;
    let members = match member {
        Descriptor::Callable(_) => Vec::new(),
        Descriptor::Class(id) => {
            let mut members = render_members(session, Container::Class(*id))?;
            if let Some(class_object) = session.class(*id)?.class_object(session)? {
                members.push(render_member(session, &Descriptor::Class(class_object))?);
            }
            members
        }
    };
    Ok(DeclarationReport { signature, members })
}
