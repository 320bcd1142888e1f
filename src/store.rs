use crate::router::PathParam;

// Constants
const FIRST_ID: u64 = 1;

// ============================================================================
// POST RECORD
// ============================================================================

/// A stored post record
///
/// The id is assigned by the store at creation time and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: u64,
    title: String,
    description: String,
}

impl Post {
    /// Returns the unique identifier assigned at creation
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the post title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the post description
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A `&Post` can fill an `:id` placeholder directly; the store-assigned
/// identifier is extracted automatically.
impl PathParam for Post {
    fn path_value(&self) -> String {
        self.id.to_string()
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Process-local, creation-ordered post storage
///
/// Backs the list/detail pages and the test fixtures. Ids are a monotonic
/// counter starting at 1; records are never updated or deleted.
#[derive(Debug, Clone)]
pub struct PostStore {
    posts: Vec<Post>,
    next_id: u64,
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PostStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            next_id: FIRST_ID,
        }
    }

    /// Creates and stores a new post, returning a reference to it
    ///
    /// Always succeeds; the fresh id is unique within this store.
    pub fn create(&mut self, title: &str, description: &str) -> &Post {
        let post = Post {
            id: self.next_id,
            title: title.to_string(),
            description: description.to_string(),
        };
        self.next_id += 1;
        self.posts.push(post);

        // Just pushed, so the vector is non-empty.
        self.posts.last().unwrap()
    }

    /// Returns all posts in creation order
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// Looks up a post by id
    pub fn find(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Returns the number of stored posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns true if the store holds no posts
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
