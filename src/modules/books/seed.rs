//! Initial books inserted at startup, and the named routes serving them.

use bookstore_kernel::settings::SeedMode;

use super::models::BookDraft;
use super::store::{BookStore, StoreResult};

/// A seeded book and the path that looks it up by title.
pub struct SeedBook {
    pub path: &'static str,
    pub name: &'static str,
    pub img: &'static str,
    pub summary: &'static str,
}

impl SeedBook {
    pub fn draft(&self) -> BookDraft {
        BookDraft::new(self.name, self.img, self.summary)
    }
}

pub const INITIAL_BOOKS: [SeedBook; 3] = [
    SeedBook {
        path: "/harrypotter",
        name: "Harry Potter and the Order of the Phoenix",
        img: "https://bit.ly/2IcnSwz",
        summary: "Harry Potter and Dumbledore's warning about the return of Lord Voldemort is not heeded by the wizard authorities who, in turn, look to undermine Dumbledore's authority at Hogwarts and discredit Harry.",
    },
    SeedBook {
        path: "/lordoftherings",
        name: "The Lord of the Rings: The Fellowship of the Ring",
        img: "https://bit.ly/2tC1Lcg",
        summary: "A young hobbit, Frodo, who has found the One Ring that belongs to the Dark Lord Sauron, begins his journey with eight companions to Mount Doom, the only place where it can be destroyed.",
    },
    SeedBook {
        path: "/avengers",
        name: "Avengers: Endgame",
        img: "https://bit.ly/2Pzczlb",
        summary: "Adrift in space with no food or water, Tony Stark sends a message to Pepper Potts as his oxygen supply starts to dwindle. Meanwhile, the remaining Avengers -- Thor, Black Widow, Captain America, and Bruce Banner -- must figure out a way to bring back their vanquished allies for an epic showdown with Thanos -- the evil demigod who decimated the planet and the universe.",
    },
];

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(usize),
    SkippedNonEmpty,
    Disabled,
}

/// Insert [`INITIAL_BOOKS`] according to `mode`.
///
/// `SeedMode::Always` performs no existence check, so every run adds three
/// more records.
pub async fn seed(store: &dyn BookStore, mode: SeedMode) -> StoreResult<SeedOutcome> {
    match mode {
        SeedMode::Never => return Ok(SeedOutcome::Disabled),
        SeedMode::IfEmpty => {
            if store.count().await? > 0 {
                return Ok(SeedOutcome::SkippedNonEmpty);
            }
        }
        SeedMode::Always => {}
    }

    let drafts: Vec<BookDraft> = INITIAL_BOOKS.iter().map(SeedBook::draft).collect();
    let inserted = drafts.len();
    store.insert_many(drafts).await?;
    Ok(SeedOutcome::Inserted(inserted))
}
