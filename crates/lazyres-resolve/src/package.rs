//! Package descriptors and their member scope strategy.
//!
//! Packages have no inheritance: nothing is synthesized and every declaration
//! resolves in the file scope, which is the package's own members followed by
//! the builtins package.

use crate::error::ResolveResult;
use crate::ids::{Container, PackageId};
use crate::member_scope::{ClassifierSeed, LazyMemberScope, MemberScopeStrategy};
use crate::scope::{ChainedScope, MemberScopeAdapter, ScopeRef};
use crate::session::ResolveSession;
use lazyres_common::FqName;
use lazyres_storage::LazyValue;
use lazyres_syntax::{ClassDecl, ClassLikeInfo, Declaration, DeclarationProvider};
use std::fmt;
use std::sync::Arc;

pub struct PackageDescriptor {
    id: PackageId,
    fq_name: FqName,
    member_scope: LazyMemberScope<PackageMemberStrategy>,
}

impl PackageDescriptor {
    pub fn new(id: PackageId, fq_name: FqName, provider: Arc<dyn DeclarationProvider>) -> Self {
        let member_scope = LazyMemberScope::new(
            PackageMemberStrategy {
                package: id,
                fq_name: fq_name.clone(),
                file_scope: LazyValue::new(),
            },
            provider,
            format!("package {fq_name}"),
        );
        Self {
            id,
            fq_name,
            member_scope,
        }
    }

    pub fn id(&self) -> PackageId {
        self.id
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn member_scope(&self) -> &LazyMemberScope<PackageMemberStrategy> {
        &self.member_scope
    }

    pub fn file_scope(&self, ctx: &ResolveSession) -> ResolveResult<ScopeRef> {
        self.member_scope.strategy().file_scope(ctx)
    }
}

impl fmt::Debug for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageDescriptor")
            .field("id", &self.id)
            .field("fq_name", &self.fq_name)
            .field("member_scope", &self.member_scope)
            .finish()
    }
}

pub struct PackageMemberStrategy {
    package: PackageId,
    fq_name: FqName,
    file_scope: LazyValue<ScopeRef>,
}

impl PackageMemberStrategy {
    pub fn file_scope(&self, ctx: &ResolveSession) -> ResolveResult<ScopeRef> {
        self.file_scope.get_or_try_init(|| {
            let mut scopes: Vec<ScopeRef> = vec![Arc::new(MemberScopeAdapter::package(
                self.package,
                format!("package {}", self.fq_name),
            ))];
            let builtins = ctx.builtins_package_name();
            if builtins != &self.fq_name {
                if let Some(id) = ctx.package(builtins)? {
                    scopes.push(Arc::new(MemberScopeAdapter::package(
                        id,
                        format!("default import {builtins}"),
                    )));
                }
            }
            let scope: ScopeRef = Arc::new(ChainedScope::new(
                format!("file scope of {}", self.fq_name),
                scopes,
            ));
            Ok(scope)
        })
    }
}

impl MemberScopeStrategy for PackageMemberStrategy {
    fn container(&self) -> Container {
        Container::Package(self.package)
    }

    fn scope_for_declaration(
        &self,
        _scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        _decl: &Declaration,
    ) -> ResolveResult<ScopeRef> {
        self.file_scope(ctx)
    }

    fn classifier_seed(
        &self,
        _scope: &LazyMemberScope<Self>,
        ctx: &ResolveSession,
        decl: &Arc<ClassDecl>,
    ) -> ResolveResult<ClassifierSeed> {
        Ok(ClassifierSeed {
            info: ClassLikeInfo::Declared(Arc::clone(decl)),
            container: Container::Package(self.package),
            fq_name: self.fq_name.child(&decl.name),
            outer: self.file_scope(ctx)?,
        })
    }
}
