//! Categorical dimensions: colors, countries, languages, content ratings,
//! genres, keywords and people.
//!
//! Every distinct normalized name is stored exactly once per dimension.
//! [`AddDimension`] inserts the names that are not yet present and
//! [`DimensionIndexLookup`] reads the `name -> pk` mapping back for the movie
//! pass. Existing records are never renamed or updated.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    marker::PhantomData,
};

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Set, TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, info};

use crate::{
    actions::{Command, Query},
    db::insert_batched,
    entities::{content_rating, country, genre, keyword, language, movie_color, person},
    error::{AppError, AppResult},
    normalize::MovieRecord,
};

/// A `(pk, name unique)` lookup table.
pub trait Dimension: EntityTrait {
    /// Name used in logs and lookup errors.
    const LABEL: &'static str;

    type Draft: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + 'static;

    fn name_column() -> Self::Column;

    fn pk(model: &Self::Model) -> i32;

    fn name(model: &Self::Model) -> &str;

    fn draft(name: &str) -> Self::Draft;
}

macro_rules! impl_dimension {
    ($($module:ident => $label:literal),+ $(,)?) => {$(
        impl Dimension for $module::Entity {
            const LABEL: &'static str = $label;

            type Draft = $module::ActiveModel;

            fn name_column() -> Self::Column {
                $module::Column::Name
            }

            fn pk(model: &Self::Model) -> i32 {
                model.pk
            }

            fn name(model: &Self::Model) -> &str {
                &model.name
            }

            fn draft(name: &str) -> Self::Draft {
                $module::ActiveModel { name: Set(name.to_string()), ..Default::default() }
            }
        }
    )+};
}

impl_dimension! {
    movie_color => "movie_color",
    country => "country",
    language => "language",
    content_rating => "content_rating",
    genre => "genre",
    keyword => "keyword",
    person => "person",
}

/// Lower-cased name to surrogate key for one dimension.
#[derive(Clone, Debug, Default)]
pub struct DimensionIndex {
    label: &'static str,
    keys: HashMap<String, i32>,
}

impl DimensionIndex {
    pub fn new(label: &'static str) -> Self {
        Self { label, keys: HashMap::new() }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.keys.get(name).copied()
    }

    /// Key for a name the movie on `row` references; absence is fatal for the pass.
    pub fn resolve(&self, name: &str, row: usize) -> AppResult<i32> {
        self.get(name).ok_or_else(|| AppError::DimensionLookup {
            dimension: self.label,
            name: name.to_string(),
            row,
        })
    }

    /// A missing value maps to a null foreign key.
    pub fn resolve_opt(&self, name: Option<&str>, row: usize) -> AppResult<Option<i32>> {
        name.map(|n| self.resolve(n, row)).transpose()
    }

    fn insert(&mut self, name: &str, pk: i32) {
        self.keys.entry(name.to_lowercase()).or_insert(pk);
    }
}

pub struct DimensionIndexLookup<D>(PhantomData<D>);

impl<D> DimensionIndexLookup<D> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D> Default for DimensionIndexLookup<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dimension> Query for DimensionIndexLookup<D> {
    type Output = DimensionIndex;

    async fn query<C: ConnectionTrait>(&self, db: &C) -> AppResult<DimensionIndex> {
        let mut index = DimensionIndex::new(D::LABEL);
        for model in D::find().all(db).await? {
            index.insert(D::name(&model), D::pk(&model));
        }
        Ok(index)
    }
}

/// Creates records for the given names that do not exist yet.
pub struct AddDimension<D>(PhantomData<D>);

impl<D> AddDimension<D> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D> Default for AddDimension<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Command for AddDimension<D>
where
    D: Dimension,
    D::Model: IntoActiveModel<D::Draft>,
{
    type Input = BTreeSet<String>;
    /// Records created.
    type Output = usize;

    async fn execute<C: ConnectionTrait>(
        &self,
        db: &C,
        names: BTreeSet<String>,
    ) -> AppResult<usize> {
        let drafts = names.into_iter().map(|name| {
            let draft = D::draft(&name);
            (name, draft)
        });
        insert_missing::<D, _>(db, drafts).await
    }
}

/// Person variant of [`AddDimension`]; likes are only written on creation.
#[derive(Default)]
pub struct AddPersons;

impl Command for AddPersons {
    type Input = BTreeMap<String, Option<i64>>;
    type Output = usize;

    async fn execute<C: ConnectionTrait>(
        &self,
        db: &C,
        people: BTreeMap<String, Option<i64>>,
    ) -> AppResult<usize> {
        let drafts = people.into_iter().map(|(name, likes)| {
            let draft = person::ActiveModel { likes: Set(likes), ..person::Entity::draft(&name) };
            (name, draft)
        });
        insert_missing::<person::Entity, _>(db, drafts).await
    }
}

async fn insert_missing<D, C>(
    db: &C,
    drafts: impl IntoIterator<Item = (String, D::Draft)>,
) -> AppResult<usize>
where
    D: Dimension,
    D::Model: IntoActiveModel<D::Draft>,
    C: ConnectionTrait,
{
    let existing = DimensionIndexLookup::<D>::new().query(db).await?;

    let mut missing = Vec::new();
    for (name, draft) in drafts {
        if existing.contains(&name.to_lowercase()) {
            continue;
        }
        info!(dimension = D::LABEL, name = %name, "creating new record");
        missing.push(draft);
    }

    let created = missing.len();
    if created > 0 {
        let on_conflict = OnConflict::column(D::name_column()).do_nothing().to_owned();
        insert_batched(db, missing, on_conflict).await?;
    }

    debug!(dimension = D::LABEL, existing = existing.len(), created, "dimension upserted");
    Ok(created)
}

/// Distinct normalized names per dimension across a set of rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DimensionNames {
    pub colors: BTreeSet<String>,
    pub countries: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub content_ratings: BTreeSet<String>,
    pub genres: BTreeSet<String>,
    pub keywords: BTreeSet<String>,
    /// Name to the first likes count reported for that person.
    pub people: BTreeMap<String, Option<i64>>,
}

impl DimensionNames {
    pub fn collect<'a>(records: impl IntoIterator<Item = &'a MovieRecord>) -> Self {
        let mut names = Self::default();
        for record in records {
            names.colors.extend(record.color.clone());
            names.countries.extend(record.country.clone());
            names.languages.extend(record.language.clone());
            names.content_ratings.extend(record.content_rating.clone());
            names.genres.extend(record.genres.iter().cloned());
            names.keywords.extend(record.keywords.iter().cloned());
            for credit in record.people() {
                let likes = names.people.entry(credit.name.clone()).or_insert(None);
                if likes.is_none() {
                    *likes = credit.likes;
                }
            }
        }
        names
    }
}

/// Records created per dimension by [`upsert_dimensions`].
pub type CreatedCounts = BTreeMap<&'static str, usize>;

/// Runs the upsert for every dimension, committing each one separately.
pub async fn upsert_dimensions(
    db: &DatabaseConnection,
    names: DimensionNames,
) -> AppResult<CreatedCounts> {
    let mut created = CreatedCounts::new();

    created.insert(
        movie_color::Entity::LABEL,
        add_committed::<movie_color::Entity>(db, names.colors).await?,
    );
    created.insert(
        country::Entity::LABEL,
        add_committed::<country::Entity>(db, names.countries).await?,
    );
    created.insert(
        language::Entity::LABEL,
        add_committed::<language::Entity>(db, names.languages).await?,
    );
    created.insert(
        content_rating::Entity::LABEL,
        add_committed::<content_rating::Entity>(db, names.content_ratings).await?,
    );
    created.insert(
        genre::Entity::LABEL,
        add_committed::<genre::Entity>(db, names.genres).await?,
    );
    created.insert(
        keyword::Entity::LABEL,
        add_committed::<keyword::Entity>(db, names.keywords).await?,
    );

    let txn = db.begin().await?;
    let people = AddPersons.execute(&txn, names.people).await?;
    txn.commit().await?;
    created.insert(person::Entity::LABEL, people);

    Ok(created)
}

async fn add_committed<D>(db: &DatabaseConnection, names: BTreeSet<String>) -> AppResult<usize>
where
    D: Dimension,
    D::Model: IntoActiveModel<D::Draft>,
{
    let txn = db.begin().await?;
    let created = AddDimension::<D>::new().execute(&txn, names).await?;
    txn.commit().await?;
    Ok(created)
}

/// Indices for every dimension, read back after the upsert pass.
#[derive(Clone, Debug, Default)]
pub struct DimensionIndices {
    pub colors: DimensionIndex,
    pub countries: DimensionIndex,
    pub languages: DimensionIndex,
    pub content_ratings: DimensionIndex,
    pub genres: DimensionIndex,
    pub keywords: DimensionIndex,
    pub people: DimensionIndex,
}

impl DimensionIndices {
    pub async fn load<C: ConnectionTrait>(db: &C) -> AppResult<Self> {
        Ok(Self {
            colors: DimensionIndexLookup::<movie_color::Entity>::new().query(db).await?,
            countries: DimensionIndexLookup::<country::Entity>::new().query(db).await?,
            languages: DimensionIndexLookup::<language::Entity>::new().query(db).await?,
            content_ratings: DimensionIndexLookup::<content_rating::Entity>::new().query(db).await?,
            genres: DimensionIndexLookup::<genre::Entity>::new().query(db).await?,
            keywords: DimensionIndexLookup::<keyword::Entity>::new().query(db).await?,
            people: DimensionIndexLookup::<person::Entity>::new().query(db).await?,
        })
    }
}
