use std::collections::HashSet;

use rand::{
    seq::{IndexedRandom, SliceRandom},
    Rng,
};

use crate::{
    error::AppResult,
    models::{
        vocabulary::GENRES, Disposition, Preference, PreferenceType, User, WatchHistoryEntry,
    },
};

use super::Store;

use Disposition::{Dislike, Like};
use PreferenceType::{Genre, Tag};

const FILMS_PER_LIKED_GENRE: usize = 4;
const MAX_NEUTRAL_FILMS: usize = 5;

/// A film of the demo catalog, mirroring the documents fed to the engine
#[derive(Debug, Clone, Copy)]
pub struct SeedFilm {
    pub id: &'static str,
    pub title: &'static str,
    pub genre: &'static str,
    pub year: i32,
    pub tags: &'static [&'static str],
}

const fn film(
    id: &'static str,
    title: &'static str,
    genre: &'static str,
    year: i32,
    tags: &'static [&'static str],
) -> SeedFilm {
    SeedFilm {
        id,
        title,
        genre,
        year,
        tags,
    }
}

pub const FILMS: &[SeedFilm] = &[
    film("1", "The Shawshank Redemption", "Drama", 1994, &["classic", "adaptation"]),
    film("2", "The Godfather", "Crime", 1972, &["classic", "oscar-winner", "adaptation"]),
    film("3", "The Dark Knight", "Action", 2008, &["blockbuster", "sequel", "visually-stunning"]),
    film("4", "Pulp Fiction", "Crime", 1994, &["classic", "oscar-winner", "ensemble-cast"]),
    film("5", "Schindler's List", "Drama", 1993, &["classic", "oscar-winner", "thought-provoking"]),
    film("6", "Inception", "Sci-Fi", 2010, &["blockbuster", "visually-stunning", "thought-provoking"]),
    film("7", "Fight Club", "Drama", 1999, &["cult-favorite", "adaptation", "thought-provoking"]),
    film("8", "Forrest Gump", "Drama", 1994, &["classic", "oscar-winner", "adaptation"]),
    film("9", "The Matrix", "Sci-Fi", 1999, &["blockbuster", "visually-stunning", "cult-favorite"]),
    film("10", "Goodfellas", "Crime", 1990, &["classic", "adaptation", "ensemble-cast"]),
    film("11", "The Silence of the Lambs", "Thriller", 1991, &["classic", "oscar-winner", "adaptation"]),
    film("12", "Spirited Away", "Animation", 2001, &["oscar-winner", "visually-stunning", "classic"]),
    film("13", "Saving Private Ryan", "Action", 1998, &["classic", "oscar-winner", "visually-stunning"]),
    film("14", "Interstellar", "Sci-Fi", 2014, &["blockbuster", "visually-stunning", "thought-provoking"]),
    film("15", "The Green Mile", "Drama", 1999, &["adaptation", "classic", "thought-provoking"]),
    film("16", "Se7en", "Thriller", 1995, &["classic", "thought-provoking", "visually-stunning"]),
    film("17", "The Lion King", "Animation", 1994, &["classic", "oscar-winner", "blockbuster"]),
    film("18", "Gladiator", "Action", 2000, &["oscar-winner", "blockbuster", "visually-stunning"]),
    film("19", "The Departed", "Crime", 2006, &["oscar-winner", "ensemble-cast", "adaptation"]),
    film("20", "When Harry Met Sally", "Romance", 1989, &["classic", "thought-provoking"]),
    film("21", "Die Hard", "Action", 1988, &["classic", "blockbuster", "cult-favorite"]),
    film("22", "The Shining", "Horror", 1980, &["classic", "adaptation", "cult-favorite"]),
    film("23", "Toy Story", "Animation", 1995, &["classic", "blockbuster", "visually-stunning"]),
    film("24", "The Prestige", "Thriller", 2006, &["adaptation", "thought-provoking", "ensemble-cast"]),
    film("25", "Alien", "Horror", 1979, &["classic", "visually-stunning", "oscar-winner"]),
    film("26", "Back to the Future", "Adventure", 1985, &["classic", "blockbuster", "cult-favorite"]),
    film("27", "The Notebook", "Romance", 2004, &["adaptation", "classic", "blockbuster"]),
    film("28", "Superbad", "Comedy", 2007, &["cult-favorite", "ensemble-cast", "blockbuster"]),
    film("29", "Blade Runner 2049", "Sci-Fi", 2017, &["sequel", "visually-stunning", "thought-provoking"]),
    film("30", "The Exorcist", "Horror", 1973, &["classic", "oscar-winner", "adaptation"]),
    film("31", "Raiders of the Lost Ark", "Adventure", 1981, &["classic", "blockbuster", "oscar-winner"]),
    film("32", "The Big Lebowski", "Comedy", 1998, &["cult-favorite", "classic", "ensemble-cast"]),
    film("33", "Titanic", "Romance", 1997, &["oscar-winner", "blockbuster", "visually-stunning"]),
    film("34", "Mad Max: Fury Road", "Action", 2015, &["oscar-winner", "visually-stunning", "blockbuster"]),
    film("35", "Parasite", "Thriller", 2019, &["oscar-winner", "thought-provoking", "visually-stunning"]),
    film("36", "Get Out", "Horror", 2017, &["oscar-winner", "thought-provoking", "indie"]),
    film("37", "WALL-E", "Animation", 2008, &["oscar-winner", "visually-stunning", "thought-provoking"]),
    film("38", "The Princess Bride", "Adventure", 1987, &["classic", "cult-favorite", "adaptation"]),
    film("39", "Groundhog Day", "Comedy", 1993, &["classic", "cult-favorite", "thought-provoking"]),
    film("40", "2001: A Space Odyssey", "Sci-Fi", 1968, &["classic", "visually-stunning", "thought-provoking"]),
    film("41", "Zodiac", "Thriller", 2007, &["adaptation", "ensemble-cast", "thought-provoking"]),
    film("42", "Pride & Prejudice", "Romance", 2005, &["adaptation", "visually-stunning"]),
    film("43", "The Terminator", "Action", 1984, &["classic", "cult-favorite", "blockbuster"]),
    film("44", "Psycho", "Horror", 1960, &["classic", "thought-provoking"]),
    film("45", "Finding Nemo", "Animation", 2003, &["oscar-winner", "blockbuster", "visually-stunning"]),
    film("46", "Jurassic Park", "Adventure", 1993, &["blockbuster", "visually-stunning", "classic"]),
    film("47", "The Usual Suspects", "Crime", 1995, &["oscar-winner", "cult-favorite", "ensemble-cast"]),
    film("48", "Bridesmaids", "Comedy", 2011, &["blockbuster", "ensemble-cast"]),
    film("49", "Eternal Sunshine of the Spotless Mind", "Romance", 2004, &["oscar-winner", "indie", "thought-provoking"]),
    film("50", "Arrival", "Sci-Fi", 2016, &["adaptation", "thought-provoking", "visually-stunning"]),
    film("51", "No Country for Old Men", "Thriller", 2007, &["oscar-winner", "adaptation", "thought-provoking"]),
    film("52", "John Wick", "Action", 2014, &["blockbuster", "cult-favorite", "visually-stunning"]),
    film("53", "It", "Horror", 2017, &["adaptation", "blockbuster", "ensemble-cast"]),
    film("54", "Up", "Animation", 2009, &["oscar-winner", "visually-stunning", "thought-provoking"]),
    film("55", "The Lord of the Rings: The Fellowship of the Ring", "Adventure", 2001, &["oscar-winner", "adaptation", "blockbuster"]),
    film("56", "Heat", "Crime", 1995, &["classic", "ensemble-cast", "visually-stunning"]),
    film("57", "Airplane!", "Comedy", 1980, &["classic", "cult-favorite", "ensemble-cast"]),
    film("58", "Before Sunrise", "Romance", 1995, &["indie", "thought-provoking", "classic"]),
    film("59", "Ex Machina", "Sci-Fi", 2014, &["oscar-winner", "indie", "thought-provoking"]),
    film("60", "Oldboy", "Thriller", 2003, &["cult-favorite", "visually-stunning", "thought-provoking"]),
    film("61", "Kill Bill: Volume 1", "Action", 2003, &["cult-favorite", "visually-stunning", "blockbuster"]),
    film("62", "Hereditary", "Horror", 2018, &["indie", "visually-stunning", "thought-provoking"]),
    film("63", "Coco", "Animation", 2017, &["oscar-winner", "visually-stunning", "blockbuster"]),
    film("64", "Indiana Jones and the Last Crusade", "Adventure", 1989, &["classic", "blockbuster", "sequel"]),
    film("65", "City of God", "Crime", 2002, &["visually-stunning", "thought-provoking"]),
    film("66", "The Hangover", "Comedy", 2009, &["blockbuster", "ensemble-cast", "cult-favorite"]),
    film("67", "La La Land", "Romance", 2016, &["oscar-winner", "visually-stunning", "blockbuster"]),
    film("68", "Terminator 2: Judgment Day", "Action", 1991, &["sequel", "blockbuster", "visually-stunning"]),
    film("69", "The Thing", "Horror", 1982, &["cult-favorite", "classic", "visually-stunning"]),
    film("70", "Inside Out", "Animation", 2015, &["oscar-winner", "blockbuster", "thought-provoking"]),
    film("71", "The Lord of the Rings: The Return of the King", "Adventure", 2003, &["oscar-winner", "blockbuster", "sequel"]),
    film("72", "Reservoir Dogs", "Crime", 1992, &["cult-favorite", "indie", "ensemble-cast"]),
    film("73", "Anchorman", "Comedy", 2004, &["cult-favorite", "ensemble-cast", "blockbuster"]),
    film("74", "10 Things I Hate About You", "Romance", 1999, &["adaptation", "cult-favorite", "classic"]),
    film("75", "Dune", "Sci-Fi", 2021, &["adaptation", "blockbuster", "visually-stunning"]),
    film("76", "Memento", "Thriller", 2000, &["indie", "cult-favorite", "thought-provoking"]),
    film("77", "The Avengers", "Action", 2012, &["blockbuster", "sequel", "ensemble-cast"]),
    film("78", "A Quiet Place", "Horror", 2018, &["blockbuster", "thought-provoking", "visually-stunning"]),
    film("79", "Ratatouille", "Animation", 2007, &["oscar-winner", "visually-stunning", "thought-provoking"]),
    film("80", "Pirates of the Caribbean", "Adventure", 2003, &["blockbuster", "visually-stunning"]),
    film("81", "The Godfather Part II", "Crime", 1974, &["classic", "oscar-winner", "sequel"]),
    film("82", "The Grand Budapest Hotel", "Comedy", 2014, &["oscar-winner", "visually-stunning", "ensemble-cast"]),
    film("83", "Casablanca", "Romance", 1942, &["classic", "oscar-winner", "thought-provoking"]),
    film("84", "The Bourne Identity", "Action", 2002, &["adaptation", "blockbuster", "ensemble-cast"]),
    film("85", "The Conjuring", "Horror", 2013, &["blockbuster", "adaptation", "visually-stunning"]),
    film("86", "Spider-Man: Into the Spider-Verse", "Animation", 2018, &["oscar-winner", "visually-stunning", "blockbuster"]),
    film("87", "Star Wars: The Empire Strikes Back", "Adventure", 1980, &["classic", "sequel", "blockbuster"]),
    film("88", "Fargo", "Crime", 1996, &["oscar-winner", "cult-favorite", "thought-provoking"]),
    film("89", "Ghostbusters", "Comedy", 1984, &["classic", "blockbuster", "ensemble-cast"]),
    film("90", "Moonlight", "Drama", 2016, &["oscar-winner", "indie", "thought-provoking"]),
    film("91", "Gravity", "Sci-Fi", 2013, &["oscar-winner", "visually-stunning", "blockbuster"]),
    film("92", "Gone Girl", "Thriller", 2014, &["adaptation", "thought-provoking", "blockbuster"]),
    film("93", "Top Gun: Maverick", "Action", 2022, &["sequel", "blockbuster", "visually-stunning"]),
    film("94", "Midsommar", "Horror", 2019, &["indie", "visually-stunning", "cult-favorite"]),
    film("95", "The Incredibles", "Animation", 2004, &["oscar-winner", "blockbuster", "ensemble-cast"]),
    film("96", "The Lord of the Rings: The Two Towers", "Adventure", 2002, &["blockbuster", "sequel", "visually-stunning"]),
    film("97", "Sicario", "Crime", 2015, &["visually-stunning", "thought-provoking", "ensemble-cast"]),
    film("98", "Monty Python and the Holy Grail", "Comedy", 1975, &["classic", "cult-favorite", "indie"]),
    film("99", "12 Angry Men", "Drama", 1957, &["classic", "thought-provoking", "ensemble-cast"]),
    film("100", "Everything Everywhere All at Once", "Sci-Fi", 2022, &["oscar-winner", "visually-stunning", "indie"]),
];

struct SeedUser {
    id: &'static str,
    name: &'static str,
    preferences: &'static [(PreferenceType, &'static str, Disposition)],
}

/// Demo users and their preferences. Their watch history is generated at
/// seed time, see [`plan_watch_history`].
const USERS: &[SeedUser] = &[
    SeedUser {
        id: "1",
        name: "Alex",
        preferences: &[
            (Genre, "Action", Like),
            (Genre, "Sci-Fi", Like),
            (Genre, "Romance", Dislike),
            (Tag, "blockbuster", Like),
            (Tag, "visually-stunning", Like),
        ],
    },
    SeedUser {
        id: "2",
        name: "Maria",
        preferences: &[
            (Genre, "Drama", Like),
            (Genre, "Romance", Like),
            (Genre, "Horror", Dislike),
            (Tag, "oscar-winner", Like),
            (Tag, "thought-provoking", Like),
        ],
    },
    SeedUser {
        id: "3",
        name: "Jake",
        preferences: &[
            (Genre, "Comedy", Like),
            (Genre, "Animation", Like),
            (Genre, "Adventure", Like),
            (Genre, "Drama", Dislike),
            (Tag, "cult-favorite", Like),
            (Tag, "blockbuster", Like),
        ],
    },
    SeedUser {
        id: "4",
        name: "Priya",
        preferences: &[
            (Genre, "Thriller", Like),
            (Genre, "Crime", Like),
            (Genre, "Comedy", Dislike),
            (Tag, "thought-provoking", Like),
            (Tag, "classic", Like),
        ],
    },
    SeedUser {
        id: "5",
        name: "Sam",
        preferences: &[
            (Genre, "Sci-Fi", Like),
            (Genre, "Adventure", Like),
            (Genre, "Horror", Dislike),
            (Tag, "visually-stunning", Like),
            (Tag, "adaptation", Like),
        ],
    },
];

impl SeedUser {
    fn preferences(&self) -> Vec<Preference> {
        self.preferences
            .iter()
            .map(|&(kind, value, state)| Preference::new(kind, value, state))
            .collect()
    }
}

fn films_in_genre(genre: &str) -> Vec<&'static SeedFilm> {
    FILMS.iter().filter(|f| f.genre == genre).collect()
}

fn genres_with(preferences: &[Preference], state: Disposition) -> Vec<&str> {
    preferences
        .iter()
        .filter(|p| p.kind == PreferenceType::Genre && p.state == state)
        .map(|p| p.value.as_str())
        .collect()
}

fn record(
    film: &SeedFilm,
    rating: i32,
    watched: &mut HashSet<&'static str>,
    history: &mut Vec<WatchHistoryEntry>,
) -> bool {
    if !watched.insert(film.id) {
        return false;
    }
    history.push(WatchHistoryEntry {
        film_id: film.id.to_string(),
        film_title: film.title.to_string(),
        film_genre: film.genre.to_string(),
        film_year: film.year,
        film_tags: film.tags.iter().map(|t| t.to_string()).collect(),
        user_rating: rating,
    });
    true
}

/// Generates a plausible watch history for a preference set: several highly
/// rated films from liked genres, a few middling ones from neutral genres and
/// one poorly rated film per disliked genre. No film appears twice.
pub fn plan_watch_history<R: Rng>(
    rng: &mut R,
    preferences: &[Preference],
) -> Vec<WatchHistoryEntry> {
    let liked = genres_with(preferences, Disposition::Like);
    let disliked = genres_with(preferences, Disposition::Dislike);

    let mut watched = HashSet::new();
    let mut history = Vec::new();

    for genre in &liked {
        let films = films_in_genre(genre);
        for film in films.choose_multiple(rng, FILMS_PER_LIKED_GENRE) {
            let rating = rng.random_range(4..=5);
            record(film, rating, &mut watched, &mut history);
        }
    }

    let mut neutral: Vec<&str> = GENRES
        .iter()
        .copied()
        .filter(|g| !liked.contains(g) && !disliked.contains(g))
        .collect();
    neutral.shuffle(rng);

    let mut neutral_count = 0;
    for genre in neutral {
        if neutral_count >= MAX_NEUTRAL_FILMS {
            break;
        }
        if let Some(film) = films_in_genre(genre).choose(rng) {
            let rating = rng.random_range(2..=4);
            if record(film, rating, &mut watched, &mut history) {
                neutral_count += 1;
            }
        }
    }

    for genre in &disliked {
        if let Some(film) = films_in_genre(genre).choose(rng) {
            let rating = rng.random_range(1..=2);
            record(film, rating, &mut watched, &mut history);
        }
    }

    history
}

/// Inserts the demo users in one transaction unless users already exist.
///
/// Returns whether anything was written.
pub async fn seed_if_empty(store: &Store) -> AppResult<bool> {
    if store.count_users().await? > 0 {
        return Ok(false);
    }

    let plans: Vec<(User, Vec<Preference>, Vec<WatchHistoryEntry>)> = {
        let mut rng = rand::rng();
        USERS
            .iter()
            .map(|seed| {
                let preferences = seed.preferences();
                let history = plan_watch_history(&mut rng, &preferences);
                let user = User {
                    id: seed.id.to_string(),
                    name: seed.name.to_string(),
                };
                (user, preferences, history)
            })
            .collect()
    };

    let mut tx = store.pool().begin().await?;
    let mut history_rows = 0;

    for (user, preferences, history) in &plans {
        sqlx::query("INSERT INTO users (id, name) VALUES (?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .execute(&mut *tx)
            .await?;

        for preference in preferences {
            sqlx::query(
                "INSERT INTO user_preferences (user_id, pref_type, pref_value, pref_state) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&user.id)
            .bind(preference.kind)
            .bind(&preference.value)
            .bind(preference.state)
            .execute(&mut *tx)
            .await?;
        }

        for entry in history {
            let tags = serde_json::to_string(&entry.film_tags).unwrap_or_else(|_| "[]".into());
            sqlx::query(
                "INSERT INTO watch_history \
                 (user_id, film_id, film_title, film_genre, film_year, film_tags, user_rating) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&user.id)
            .bind(&entry.film_id)
            .bind(&entry.film_title)
            .bind(&entry.film_genre)
            .bind(entry.film_year)
            .bind(tags)
            .bind(entry.user_rating)
            .execute(&mut *tx)
            .await?;
            history_rows += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(
        users = plans.len(),
        history_rows,
        "Seeded database with demo users and watch history"
    );

    Ok(true)
}
