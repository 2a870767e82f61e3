//! Standard genre catalogue used to seed a fresh database.

/// `(name, description)` pairs inserted by the seed command.
pub const STANDARD_GENRES: &[(&str, &str)] = &[
    ("Action", "Films built around action sequences, adventure and adrenaline"),
    ("Comedy", "Humorous and light-hearted films"),
    ("Drama", "Dramatic films focused on character development"),
    ("Horror", "Horror and scare films"),
    ("Science Fiction", "Futuristic and science fiction films"),
    ("Romance", "Romantic films and love stories"),
    ("Thriller", "Suspense and tension films"),
    ("Adventure", "Adventure and exploration films"),
    ("Animation", "Animated films for all ages"),
    ("Documentary", "Documentaries and films based on real events"),
    ("Fantasy", "Fantasy films and imaginary worlds"),
    ("Musical", "Musicals with songs and dance"),
    ("Crime", "Police and criminal investigation films"),
    ("War", "Films about armed conflict and war"),
    ("Western", "Westerns and frontier films"),
];
