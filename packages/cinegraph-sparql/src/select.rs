/// An assembled-but-unrendered SELECT query: prefixes, projection, graph
/// patterns, and filters are collected as lists and only concatenated by
/// [`SelectQuery::render`]. Builders push escaped fragments through the
/// helpers in this crate instead of interpolating raw input.
#[derive(Debug, Default, Clone)]
pub struct SelectQuery {
	prefixes: Vec<(&'static str, &'static str)>,
	distinct: bool,
	projection: Vec<String>,
	patterns: Vec<String>,
	filters: Vec<String>,
	group_by: Vec<String>,
	having: Option<String>,
	order_by: Vec<String>,
	limit: Option<u32>,
}
impl SelectQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn prefix(mut self, name: &'static str, iri: &'static str) -> Self {
		self.prefixes.push((name, iri));

		self
	}

	pub fn distinct(mut self) -> Self {
		self.distinct = true;

		self
	}

	pub fn select(mut self, expr: impl Into<String>) -> Self {
		self.projection.push(expr.into());

		self
	}

	pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
		self.patterns.push(pattern.into());

		self
	}

	pub fn optional(self, body: impl AsRef<str>) -> Self {
		let body = body.as_ref();

		self.pattern(format!("OPTIONAL {{ {body} }}"))
	}

	pub fn filter(mut self, condition: impl AsRef<str>) -> Self {
		self.filters.push(format!("FILTER ({})", condition.as_ref()));

		self
	}

	pub fn group_by(mut self, var: impl Into<String>) -> Self {
		self.group_by.push(var.into());

		self
	}

	pub fn having(mut self, condition: impl AsRef<str>) -> Self {
		self.having = Some(format!("HAVING ({})", condition.as_ref()));

		self
	}

	pub fn order_by(mut self, expr: impl Into<String>) -> Self {
		self.order_by.push(expr.into());

		self
	}

	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}

	pub fn render(&self) -> String {
		let mut out = String::new();

		for (name, iri) in &self.prefixes {
			out.push_str(&format!("PREFIX {name}: <{iri}>\n"));
		}

		out.push_str("SELECT");

		if self.distinct {
			out.push_str(" DISTINCT");
		}

		for expr in &self.projection {
			out.push(' ');
			out.push_str(expr);
		}

		out.push_str("\nWHERE {\n");

		for pattern in &self.patterns {
			out.push('\t');
			out.push_str(pattern);
			out.push('\n');
		}
		for filter in &self.filters {
			out.push('\t');
			out.push_str(filter);
			out.push('\n');
		}

		out.push('}');

		if !self.group_by.is_empty() {
			out.push_str("\nGROUP BY");

			for var in &self.group_by {
				out.push(' ');
				out.push_str(var);
			}
		}
		if let Some(having) = &self.having {
			out.push('\n');
			out.push_str(having);
		}
		if !self.order_by.is_empty() {
			out.push_str("\nORDER BY");

			for expr in &self.order_by {
				out.push(' ');
				out.push_str(expr);
			}
		}
		if let Some(limit) = self.limit {
			out.push_str(&format!("\nLIMIT {limit}"));
		}

		out.push('\n');

		out
	}
}
