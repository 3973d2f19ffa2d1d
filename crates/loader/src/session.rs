use crate::{LoaderError, Result, RootType, Segment, TypeLoader, Workspace};
use gqlvis_introspect::Transport;
use gqlvis_query::BuiltQuery;
use gqlvis_schema::SimplifiedType;
use parking_lot::Mutex;

const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Drives a [`Workspace`] with types fetched through a [`TypeLoader`].
///
/// The workspace lock is never held across a load. Each load takes a
/// ticket first and its result is dropped with [`LoaderError::Stale`] if
/// the workspace moved on in the meantime.
pub struct Session<T> {
    loader: TypeLoader<T>,
    workspace: Mutex<Workspace>,
}

impl<T: Transport> Session<T> {
    #[must_use]
    pub fn new(loader: TypeLoader<T>) -> Self {
        Self {
            loader,
            workspace: Mutex::new(Workspace::new()),
        }
    }

    #[must_use]
    pub const fn loader(&self) -> &TypeLoader<T> {
        &self.loader
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Workspace {
        self.workspace.lock().clone()
    }

    /// Loads the root type and selects its first selectable field.
    ///
    /// Selectable means composite: object and interface fields, lists
    /// included. Interface-typed root fields are offered as well as object
    /// ones; scalar root fields never are.
    pub async fn introspect(&self) -> Result<RootType> {
        let generation = self.workspace.lock().reset();

        let root = self.loader.load_root().await?;
        let root_type = self
            .loader
            .load_type(&root.name)
            .await?
            .ok_or_else(|| LoaderError::TypeUnavailable(root.name.clone()))?;

        let mut workspace = self.workspace.lock();
        if !workspace.set_root(generation, root.clone()) {
            return Err(LoaderError::Stale(root.name));
        }
        match root_type.composite_fields().next() {
            Some((name, field)) => workspace.select_root_field(name, field),
            None => tracing::warn!(root = %root.name, "Root type has no selectable fields"),
        }
        Ok(root)
    }

    /// The cached query root type.
    fn root_type(&self) -> Result<SimplifiedType> {
        let name = self
            .workspace
            .lock()
            .root_type()
            .map(|root| root.name.clone())
            .ok_or(LoaderError::NotIntrospected)?;
        self.loader
            .get_type(&name)
            .ok_or(LoaderError::TypeUnavailable(name))
    }

    /// Root fields that can start a query: those of object or interface type.
    pub fn root_fields(&self) -> Result<Vec<String>> {
        let root_type = self.root_type()?;
        Ok(root_type
            .composite_fields()
            .map(|(name, _)| name.to_string())
            .collect())
    }

    /// Starts over with the root field `name`.
    pub fn choose_root_field(&self, name: &str) -> Result<()> {
        let root_type = self.root_type()?;
        let field = root_type
            .field(name)
            .filter(|field| field.kind.is_composite())
            .ok_or_else(|| LoaderError::UnknownRootField {
                type_name: root_type.name.clone(),
                field: name.to_string(),
                suggestion: root_type
                    .composite_fields()
                    .map(|(candidate, _)| (candidate, strsim::jaro_winkler(name, candidate)))
                    .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
                    .max_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(candidate, _)| candidate.to_string()),
            })?;

        self.workspace.lock().select_root_field(name, field);
        Ok(())
    }

    /// Loads the type of the node at `path`.
    pub async fn resolve(&self, path: &[usize]) -> Result<SimplifiedType> {
        let ticket = self.workspace.lock().ticket(path)?;
        let loaded = self.loader.load_type(ticket.type_name()).await?;

        if !self.workspace.lock().is_current(&ticket) {
            return Err(LoaderError::Stale(ticket.type_name().to_string()));
        }
        loaded.ok_or_else(|| LoaderError::TypeUnavailable(ticket.type_name().to_string()))
    }

    /// Follows `segments` from the root, adding nested fields and inline
    /// fragments that are not selected yet. Returns the index path.
    pub async fn ensure_path(&self, segments: &[Segment]) -> Result<Vec<usize>> {
        let mut path = Vec::with_capacity(segments.len());

        for segment in segments {
            let resolved = self.resolve(&path).await?;
            let mut workspace = self.workspace.lock();
            let node = workspace.node_at(&path)?;

            let existing = match segment {
                Segment::Field(name) => node.field_child_index(name),
                Segment::Fragment(name) => node.fragment_index(name),
            };

            let index = match existing {
                Some(index) => index,
                None => {
                    let len = node.children().len();
                    match segment {
                        Segment::Field(name) => {
                            workspace.edit(&path, |node| node.add_child(name, &resolved))?;
                        }
                        Segment::Fragment(name) => {
                            let possible = resolved.possible_type(name).ok_or_else(|| {
                                LoaderError::InvalidPath {
                                    path: segment.to_string(),
                                    reason: format!("{name} is not a possible type of {}", resolved.name),
                                }
                            })?;
                            workspace.edit(&path, |node| node.add_inline_fragment(possible))?;
                        }
                    }
                    tracing::debug!(segment = %segment, "Added to selection");
                    len
                }
            };
            path.push(index);
        }

        Ok(path)
    }

    /// Selects the field at the end of `segments`: scalars by name, other
    /// fields as nested selections.
    pub async fn select_field(&self, segments: &[Segment]) -> Result<()> {
        let Some((Segment::Field(name), parent)) = segments.split_last() else {
            self.ensure_path(segments).await?;
            return Ok(());
        };

        let parent_path = self.ensure_path(parent).await?;
        let resolved = self.resolve(&parent_path).await?;

        if resolved.field(name).is_some_and(|field| field.kind.is_scalar()) {
            self.workspace
                .lock()
                .edit(&parent_path, |node| Ok(node.add_scalar(name)))
        } else {
            self.ensure_path(segments).await.map(|_| ())
        }
    }

    /// Selects argument `arg` of the field at the end of `segments`.
    pub async fn select_argument(&self, segments: &[Segment], arg: &str) -> Result<()> {
        let path = self.ensure_path(segments).await?;
        let mut workspace = self.workspace.lock();

        if !workspace.node_at(&path)?.args_def().contains_key(arg) {
            let owner = segments
                .last()
                .map_or_else(|| workspace.root_field().unwrap_or_default().to_string(), ToString::to_string);
            return Err(LoaderError::InvalidPath {
                path: format!("{owner}.{arg}"),
                reason: format!("{owner} has no argument '{arg}'"),
            });
        }

        workspace.edit(&path, |node| Ok(node.add_argument(arg)))
    }

    /// Renders the current query, skipping fields the cached schema no longer has.
    pub fn build(&self) -> Result<BuiltQuery> {
        let resolver = |name: &str| self.loader.get_type(name);
        self.workspace.lock().build(Some(&resolver))
    }
}
