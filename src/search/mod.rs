//! Tantivy-based search index module.
//!
//! Provides full-text search over the public course catalog with field
//! boosting. Only published, non-private courses are indexed.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Course;

/// Field boost values matching frontend weights.
const BOOST_TITLE: f32 = 10.0;
const BOOST_DESCRIPTION: f32 = 6.0;
const BOOST_CATEGORY: f32 = 4.0;
const BOOST_LANGUAGE: f32 = 2.0;

/// Search result with course and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub course_id: String,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    course_id: Field,
    title: Field,
    description: Field,
    category: Field,
    language: Field,
}

/// Tantivy search index for the course catalog.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        // Define schema
        let mut schema_builder = Schema::builder();
        let course_id = schema_builder.add_text_field("course_id", STRING | STORED);
        let title = schema_builder.add_text_field("title", TEXT | STORED);
        let description = schema_builder.add_text_field("description", TEXT);
        let category = schema_builder.add_text_field("category", TEXT);
        let language = schema_builder.add_text_field("language", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            course_id,
            title,
            description,
            category,
            language,
        };

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from the course list.
    pub async fn rebuild(&self, courses: &[Course]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Clear existing index
        writer.delete_all_documents()?;

        let mut indexed = 0usize;
        for course in courses {
            if course.is_published && !course.is_private {
                writer.add_document(self.create_document(course))?;
                indexed += 1;
            }
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} courses", indexed);
        Ok(())
    }

    /// Index a single course, or drop it if it is no longer publicly visible.
    pub async fn index_course(&self, course: &Course) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Delete existing document if any
        let term = tantivy::Term::from_field_text(self.fields.course_id, &course.id);
        writer.delete_term(term);

        if course.is_published && !course.is_private {
            writer.add_document(self.create_document(course))?;
        }
        writer.commit()?;

        // Reload reader
        self.reader.reload()?;

        Ok(())
    }

    /// Remove a course from the index.
    pub async fn remove_course(&self, course_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term = tantivy::Term::from_field_text(self.fields.course_id, course_id);
        writer.delete_term(term);
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Search for courses matching the query.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        // Create query parser for all searchable fields
        let query_parser = QueryParser::for_index(
            &self.index,
            vec![
                self.fields.title,
                self.fields.description,
                self.fields.category,
                self.fields.language,
            ],
        );

        // Parse the user query
        let base_query = query_parser
            .parse_query(query_str)
            .map_err(|e| AppError::Search(format!("Invalid search query: {}", e)))?;

        // Create field-specific boosted queries
        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();

        let field_queries = [
            (self.fields.title, BOOST_TITLE),
            (self.fields.description, BOOST_DESCRIPTION),
            (self.fields.category, BOOST_CATEGORY),
            (self.fields.language, BOOST_LANGUAGE),
        ];

        for (field, boost) in field_queries {
            let field_parser = QueryParser::for_index(&self.index, vec![field]);
            if let Ok(field_query) = field_parser.parse_query(query_str) {
                let boosted = BoostQuery::new(field_query, boost);
                subqueries.push((Occur::Should, Box::new(boosted)));
            }
        }

        // Combine with OR semantics
        let combined_query = if subqueries.is_empty() {
            base_query
        } else {
            Box::new(BooleanQuery::new(subqueries))
        };

        // Execute search with pagination
        let top_docs = searcher
            .search(&combined_query, &TopDocs::with_limit(limit + offset))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        // Extract results with pagination
        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let course_id = doc.get_first(self.fields.course_id)?.as_str()?.to_string();
                Some(SearchResult { course_id, score })
            })
            .collect();

        Ok(results)
    }

    /// Create a Tantivy document from a course.
    fn create_document(&self, course: &Course) -> TantivyDocument {
        doc!(
            self.fields.course_id => course.id.clone(),
            self.fields.title => course.title.clone(),
            self.fields.description => course.description.clone().unwrap_or_default(),
            self.fields.category => course.category.clone(),
            self.fields.language => course.language.clone()
        )
    }
}
