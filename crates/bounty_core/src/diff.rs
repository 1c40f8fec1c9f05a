use crate::{default_program_url, ChangeKind, ChangeRecord, PlatformSnapshot, Program, TargetSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffOptions {
    /// Emit a `Delisted` record for programs that vanished from a platform.
    pub report_delisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformDiff {
    pub changes: Vec<ChangeRecord>,
    /// Replaces the platform's previous snapshot wholesale.
    pub snapshot: PlatformSnapshot,
    /// Programs in the previous snapshot that are missing from this one, sorted.
    pub delisted: Vec<String>,
}

/// Compare one platform's freshly fetched programs against its previous snapshot.
///
/// Programs without a resolvable name are skipped. Records follow the order
/// of `programs`; delisted records, when enabled, come last.
pub fn diff_platform(
    platform: &str,
    programs: &[Program],
    previous: Option<&PlatformSnapshot>,
    options: DiffOptions,
) -> PlatformDiff {
    let mut diff = PlatformDiff::default();

    for program in programs {
        let Some(name) = program.name.as_deref() else {
            continue;
        };
        let current = &program.targets;
        diff.snapshot.insert(name.to_string(), current.clone());

        let record = match previous.and_then(|snapshot| snapshot.get(name)) {
            None if current.is_empty() => None,
            None => Some(ChangeRecord {
                platform: platform.to_string(),
                program: name.to_string(),
                url: program.url_or_default(platform),
                kind: ChangeKind::NewProgram,
                added: current.clone(),
                removed: Default::default(),
            }),
            Some(before) => {
                let added: TargetSet = current.difference(before).cloned().collect();
                let removed: TargetSet = before.difference(current).cloned().collect();
                (!added.is_empty() || !removed.is_empty()).then(|| ChangeRecord {
                    platform: platform.to_string(),
                    program: name.to_string(),
                    url: program.url_or_default(platform),
                    kind: ChangeKind::Updated,
                    added,
                    removed,
                })
            }
        };
        diff.changes.extend(record);
    }

    if let Some(before) = previous {
        for (name, targets) in before {
            if diff.snapshot.contains_key(name) {
                continue;
            }
            diff.delisted.push(name.clone());
            if options.report_delisted && !targets.is_empty() {
                diff.changes.push(ChangeRecord {
                    platform: platform.to_string(),
                    program: name.clone(),
                    url: default_program_url(platform),
                    kind: ChangeKind::Delisted,
                    added: Default::default(),
                    removed: targets.clone(),
                });
            }
        }
    }

    diff
}
