use cinegraph_config::RankingWeights;
use cinegraph_domain::{EntityKind, MovieAttribute};

use crate::{
	Error, Result,
	escape::{escape_literal, validate_iri},
	select::SelectQuery,
};

pub const DBO: &str = "http://dbpedia.org/ontology/";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// Project ontology namespace; holds the plot-embedding literal property.
pub const CG: &str = "http://cinegraph.io/ontology/";

/// One attribute filter from a request: every value must match (joined
/// per-value), except `Title` values which are OR-ed against the label.
#[derive(Debug, Clone)]
pub struct MovieFilter {
	pub attribute: MovieAttribute,
	pub values: Vec<String>,
}

struct WeightedAttribute {
	property: &'static str,
	target_var: &'static str,
	shared_var: &'static str,
	weight: u32,
}

fn weighted_attributes(weights: &RankingWeights) -> Vec<WeightedAttribute> {
	[
		("dbo:genre", "?targetGenre", "?sharedGenre", weights.genre),
		("dbo:starring", "?targetActor", "?sharedActor", weights.actor),
		("dbo:director", "?targetDirector", "?sharedDirector", weights.director),
		("dbo:country", "?targetCountry", "?sharedCountry", weights.country),
		("dbo:releaseYear", "?targetYear", "?sharedYear", weights.release_year),
	]
	.into_iter()
	.filter(|(_, _, _, weight)| *weight > 0)
	.map(|(property, target_var, shared_var, weight)| WeightedAttribute {
		property,
		target_var,
		shared_var,
		weight,
	})
	.collect()
}

fn graph_score_expr(attributes: &[WeightedAttribute]) -> String {
	attributes
		.iter()
		.map(|attr| format!("(COUNT(DISTINCT {}) * {})", attr.shared_var, attr.weight))
		.collect::<Vec<_>>()
		.join(" + ")
}

/// The weighted similarity query. The target movie binds first, its
/// attribute values are pulled through OPTIONAL joins (a target missing an
/// attribute contributes weight 0, it is not excluded), and every candidate
/// movie re-joins each attribute against the target's values. Rows with a
/// non-positive score are cut by HAVING; the target itself survives through
/// its self-matches.
pub fn similar_movies_query(
	target_uri: &str,
	filters: &[MovieFilter],
	start_year: Option<i32>,
	end_year: Option<i32>,
	weights: &RankingWeights,
	language: &str,
	limit: u32,
) -> Result<String> {
	let target_uri = validate_iri(target_uri)?;
	let attributes = weighted_attributes(weights);
	// Config validation keeps at least one weight positive; the constant
	// still renders a well-formed query if that ever changes.
	let score_expr = if attributes.is_empty() {
		"0".to_string()
	} else {
		graph_score_expr(&attributes)
	};

	let mut query = SelectQuery::new()
		.prefix("dbo", DBO)
		.prefix("rdfs", RDFS)
		.prefix("xsd", XSD)
		.prefix("cg", CG)
		.select("?movie")
		.select("?title")
		.select("?embedding")
		.select(format!("({score_expr} AS ?graphScore)"))
		.pattern(format!("BIND(<{target_uri}> AS ?target)"));

	for attr in &attributes {
		query = query.optional(format!("?target {} {} .", attr.property, attr.target_var));
	}

	query = query
		.pattern("?movie a dbo:Film .")
		.pattern("?movie rdfs:label ?title .")
		.filter(label_language_filter("?title", language))
		.optional("?movie cg:plotEmbedding ?embedding .");

	for attr in &attributes {
		query = query.optional(format!(
			"?movie {} {} . FILTER ({} = {})",
			attr.property, attr.shared_var, attr.shared_var, attr.target_var
		));
	}

	query = apply_movie_filters(query, filters, language)?;
	query = apply_year_range(query, start_year, end_year)?;
	query = query
		.group_by("?movie")
		.group_by("?title")
		.group_by("?embedding")
		.having(format!("{score_expr} > 0"))
		.order_by("DESC(?graphScore)")
		.order_by("?movie")
		.limit(limit);

	Ok(query.render())
}

/// Plain attribute filtering with no similarity machinery — the degenerate
/// no-target search. Ordered by title so identical requests page the same
/// way.
pub fn filter_movies_query(
	filters: &[MovieFilter],
	start_year: Option<i32>,
	end_year: Option<i32>,
	language: &str,
	limit: u32,
	include_embedding: bool,
) -> Result<String> {
	let mut query = SelectQuery::new()
		.prefix("dbo", DBO)
		.prefix("rdfs", RDFS)
		.prefix("xsd", XSD)
		.distinct()
		.select("?movie")
		.select("?title");

	if include_embedding {
		query = query.prefix("cg", CG).select("?embedding");
	}

	query = query.pattern("?movie a dbo:Film .").pattern("?movie rdfs:label ?title .");

	if include_embedding {
		query = query.optional("?movie cg:plotEmbedding ?embedding .");
	}

	query = apply_movie_filters(query, filters, language)?;
	query = apply_year_range(query, start_year, end_year)?;
	query = query
		.filter(label_language_filter("?title", language))
		.order_by("ASC(?title)")
		.order_by("?movie")
		.limit(limit);

	Ok(query.render())
}

/// Case-insensitive label search over one entity class.
pub fn entity_search_query(
	kind: EntityKind,
	name: Option<&str>,
	language: &str,
	limit: u32,
) -> Result<String> {
	let mut label_filter = label_language_filter("?label", language);

	if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
		let needle = escape_literal(&name.to_lowercase());

		label_filter.push_str(&format!(" && CONTAINS(LCASE(STR(?label)), \"{needle}\")"));
	}

	let query = SelectQuery::new()
		.prefix("dbo", DBO)
		.prefix("rdfs", RDFS)
		.distinct()
		.select("?entity")
		.select("?label")
		.pattern(format!("?entity a {} .", kind.class_iri()))
		.pattern("?entity rdfs:label ?label .")
		.filter(label_filter)
		.order_by("ASC(?label)")
		.limit(limit);

	Ok(query.render())
}

/// Point lookup of one entity's label; used to distinguish "target exists
/// but matched nothing" from "target is not in the knowledge base".
pub fn entity_label_query(uri: &str, language: &str) -> Result<String> {
	let uri = validate_iri(uri)?;
	let query = SelectQuery::new()
		.prefix("rdfs", RDFS)
		.select("?label")
		.pattern(format!("<{uri}> rdfs:label ?label ."))
		.filter(label_language_filter("?label", language))
		.limit(1);

	Ok(query.render())
}

/// Detail projection for a fixed set of movies, with genre/cast/crew labels
/// concatenated per movie.
pub fn movie_details_query(uris: &[String], language: &str) -> Result<String> {
	if uris.is_empty() {
		return Err(Error::NoUris);
	}

	let mut values = String::new();

	for uri in uris {
		let uri = validate_iri(uri)?;

		if !values.is_empty() {
			values.push(' ');
		}

		values.push_str(&format!("<{uri}>"));
	}

	let mut query = SelectQuery::new()
		.prefix("dbo", DBO)
		.prefix("rdfs", RDFS)
		.select("?movie")
		.select("?title")
		.select("?abstract")
		.select("?runtime")
		.select("?budget")
		.select("?boxOffice")
		.select("?releaseYear")
		.select("?countryLabel")
		.pattern(format!("VALUES ?movie {{ {values} }}"))
		.pattern("?movie rdfs:label ?title .")
		.filter(label_language_filter("?title", language))
		.optional("?movie dbo:abstract ?abstract .")
		.optional("?movie dbo:runtime ?runtime .")
		.optional("?movie dbo:budget ?budget .")
		.optional("?movie dbo:boxOffice ?boxOffice .")
		.optional("?movie dbo:releaseYear ?releaseYear .")
		.optional(format!(
			"?movie dbo:country ?country . ?country rdfs:label ?countryLabel . FILTER ({})",
			label_language_filter("?countryLabel", language)
		));

	for (alias, property, var) in [
		("genres", "dbo:genre", "?genre"),
		("starring", "dbo:starring", "?starring"),
		("directors", "dbo:director", "?director"),
		("producers", "dbo:producer", "?producer"),
		("writers", "dbo:writer", "?writer"),
		("composers", "dbo:musicComposer", "?composer"),
		("cinematographers", "dbo:cinematography", "?cinematographer"),
	] {
		query = query
			.select(format!(
				"(GROUP_CONCAT(DISTINCT {var}Label; separator=\", \") AS ?{alias})"
			))
			.optional(format!(
				"?movie {property} {var} . {var} rdfs:label {var}Label . FILTER ({})",
				label_language_filter(&format!("{var}Label"), language)
			));
	}

	query = query
		.group_by("?movie")
		.group_by("?title")
		.group_by("?abstract")
		.group_by("?runtime")
		.group_by("?budget")
		.group_by("?boxOffice")
		.group_by("?releaseYear")
		.group_by("?countryLabel");

	Ok(query.render())
}

/// The connectivity probe run against the endpoint.
pub fn ask_probe_query() -> &'static str {
	"ASK WHERE { ?s ?p ?o }"
}

fn label_language_filter(var: &str, language: &str) -> String {
	format!("LANG({var}) = \"{}\"", escape_literal(language))
}

fn apply_movie_filters(
	mut query: SelectQuery,
	filters: &[MovieFilter],
	language: &str,
) -> Result<SelectQuery> {
	for (filter_idx, filter) in filters.iter().enumerate() {
		let attribute = filter.attribute.as_str();

		if filter.values.iter().any(|value| value.trim().is_empty()) {
			return Err(Error::EmptyFilterValue { attribute: filter.attribute.as_str() });
		}

		match filter.attribute.property_iri() {
			// Title values match the movie's own label, any-of.
			None => {
				let conditions = filter
					.values
					.iter()
					.map(|value| {
						let needle = escape_literal(&value.trim().to_lowercase());

						format!("CONTAINS(LCASE(STR(?title)), \"{needle}\")")
					})
					.collect::<Vec<_>>()
					.join(" || ");

				query = query.filter(conditions);
			},
			// Entity-valued attributes join once per value, all-of.
			Some(property) => {
				for (value_idx, value) in filter.values.iter().enumerate() {
					let var = format!("?{attribute}{filter_idx}_{value_idx}");
					let needle = escape_literal(&value.trim().to_lowercase());

					query = query.pattern(format!(
						"?movie {property} {var} . {var} rdfs:label {var}Label . \
						 FILTER (CONTAINS(LCASE(STR({var}Label)), \"{needle}\")) ."
					));
				}
			},
		}
	}

	Ok(query)
}

fn apply_year_range(
	mut query: SelectQuery,
	start_year: Option<i32>,
	end_year: Option<i32>,
) -> Result<SelectQuery> {
	if let (Some(start), Some(end)) = (start_year, end_year)
		&& start > end
	{
		return Err(Error::InvalidYearRange { start, end });
	}
	if start_year.is_none() && end_year.is_none() {
		return Ok(query);
	}

	query = query.pattern("?movie dbo:releaseYear ?releaseYear .");

	if let Some(start) = start_year {
		query = query.filter(format!("?releaseYear >= \"{start}\"^^xsd:gYear"));
	}
	if let Some(end) = end_year {
		query = query.filter(format!("?releaseYear <= \"{end}\"^^xsd:gYear"));
	}

	Ok(query)
}
