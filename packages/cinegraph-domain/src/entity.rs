use serde::{Deserialize, Serialize};

/// Entity classes exposed by the knowledge base. Class names follow the
/// DBpedia-derived ontology the datasets were loaded with, including the
/// lowercase `productionCompany` oddity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Film,
	Genre,
	Actor,
	Director,
	Distributor,
	Writer,
	Producer,
	Composer,
	Cinematographer,
	ProductionCompany,
	Country,
}
impl EntityKind {
	pub const ALL: [Self; 11] = [
		Self::Film,
		Self::Genre,
		Self::Actor,
		Self::Director,
		Self::Distributor,
		Self::Writer,
		Self::Producer,
		Self::Composer,
		Self::Cinematographer,
		Self::ProductionCompany,
		Self::Country,
	];

	pub fn class_iri(self) -> &'static str {
		match self {
			Self::Film => "dbo:Film",
			Self::Genre => "dbo:Genre",
			Self::Actor => "dbo:Actor",
			Self::Director => "dbo:Director",
			Self::Distributor => "dbo:Distributor",
			Self::Writer => "dbo:Writer",
			Self::Producer => "dbo:Producer",
			Self::Composer => "dbo:Composer",
			Self::Cinematographer => "dbo:Cinematographer",
			Self::ProductionCompany => "dbo:productionCompany",
			Self::Country => "dbo:Country",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Film => "film",
			Self::Genre => "genre",
			Self::Actor => "actor",
			Self::Director => "director",
			Self::Distributor => "distributor",
			Self::Writer => "writer",
			Self::Producer => "producer",
			Self::Composer => "composer",
			Self::Cinematographer => "cinematographer",
			Self::ProductionCompany => "production_company",
			Self::Country => "country",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		let normalized = value.trim().to_ascii_lowercase();

		Self::ALL.into_iter().find(|kind| kind.as_str() == normalized)
	}
}

/// Movie attributes a search request may filter on. `Title` matches the
/// movie's own label; every other attribute joins through an entity whose
/// label is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieAttribute {
	Title,
	Genre,
	Actor,
	Director,
	Distributor,
	Writer,
	Producer,
	Composer,
	Cinematographer,
	ProductionCompany,
	Country,
}
impl MovieAttribute {
	pub const ALL: [Self; 11] = [
		Self::Title,
		Self::Genre,
		Self::Actor,
		Self::Director,
		Self::Distributor,
		Self::Writer,
		Self::Producer,
		Self::Composer,
		Self::Cinematographer,
		Self::ProductionCompany,
		Self::Country,
	];

	/// Property joining a movie to this attribute's entity. `None` for
	/// `Title`, which filters on the movie's own label instead.
	pub fn property_iri(self) -> Option<&'static str> {
		match self {
			Self::Title => None,
			Self::Genre => Some("dbo:genre"),
			Self::Actor => Some("dbo:starring"),
			Self::Director => Some("dbo:director"),
			Self::Distributor => Some("dbo:distributor"),
			Self::Writer => Some("dbo:writer"),
			Self::Producer => Some("dbo:producer"),
			Self::Composer => Some("dbo:musicComposer"),
			Self::Cinematographer => Some("dbo:cinematography"),
			Self::ProductionCompany => Some("dbo:productionCompany"),
			Self::Country => Some("dbo:country"),
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Genre => "genre",
			Self::Actor => "actor",
			Self::Director => "director",
			Self::Distributor => "distributor",
			Self::Writer => "writer",
			Self::Producer => "producer",
			Self::Composer => "composer",
			Self::Cinematographer => "cinematographer",
			Self::ProductionCompany => "production_company",
			Self::Country => "country",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		let normalized = value.trim().to_ascii_lowercase();

		Self::ALL.into_iter().find(|attr| attr.as_str() == normalized)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
	pub uri: String,
	pub label: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_kind_names_case_insensitively() {
		assert_eq!(EntityKind::parse("Film"), Some(EntityKind::Film));
		assert_eq!(EntityKind::parse(" production_company "), Some(EntityKind::ProductionCompany));
		assert_eq!(EntityKind::parse("spaceship"), None);
	}

	#[test]
	fn title_has_no_property() {
		assert_eq!(MovieAttribute::Title.property_iri(), None);
		assert_eq!(MovieAttribute::Composer.property_iri(), Some("dbo:musicComposer"));
	}
}
