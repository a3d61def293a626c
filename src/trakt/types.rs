use serde::{Deserialize, Serialize};

/// Entry of `GET /users/me/lists`.
#[derive(Debug, Clone, Deserialize)]
pub struct TraktList {
    pub name: String,
    pub ids: TraktListIds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraktListIds {
    pub trakt: u64,
}

/// Entry of `GET /users/me/lists/{id}/items`. Non-movie items have no `movie`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    pub movie: Option<ListMovie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListMovie {
    pub ids: MovieIds,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
}

/// Body of the add/remove item calls.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoviesPayload {
    pub movies: Vec<MovieRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MovieRef {
    pub ids: MovieIds,
}

impl MoviesPayload {
    pub fn from_imdb<'a>(imdb_ids: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            movies: imdb_ids
                .into_iter()
                .map(|imdb| MovieRef {
                    ids: MovieIds {
                        imdb: Some(imdb.clone()),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateList<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateList<'a> {
    pub description: &'a str,
}
