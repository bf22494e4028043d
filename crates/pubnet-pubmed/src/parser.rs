//! PubMed XML parser using quick-xml
//!
//! Streaming parser that turns each `<PubmedArticle>` into a typed
//! [`PubmedArticle`]. Only the elements the field extractors read are kept;
//! every optional element is an `Option` or an empty `Vec`, so extractors
//! never query paths that may be missing.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Error from reading the XML stream
#[derive(Debug)]
pub enum XmlError {
    Xml(quick_xml::Error),
    /// Document ended inside the named element
    UnexpectedEof(String),
}

impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML parse error: {e}"),
            Self::UnexpectedEof(inside) => write!(f, "unexpected end of document inside <{inside}>"),
        }
    }
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::UnexpectedEof(_) => None,
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

pub type XmlResult<T> = Result<T, XmlError>;

/// Year/Month/Day children of a date element, verbatim
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl DateParts {
    /// `Year-Month-Day` as written in the source; `None` if a part is missing
    pub fn to_ymd(&self) -> Option<String> {
        let (year, month, day) = (self.year.as_ref()?, self.month.as_ref()?, self.day.as_ref()?);
        Some(format!("{year}-{month}-{day}"))
    }
}

/// Date element qualified by its `PubStatus` / `DateType` attribute
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypedDate {
    pub kind: Option<String>,
    pub date: DateParts,
}

#[derive(Debug, Default, Clone)]
pub struct Author {
    pub last_name: Option<String>,
    pub fore_name: Option<String>,
    pub initials: Option<String>,
}

/// Text of one `<Abstract>` element
#[derive(Debug, Default, Clone)]
pub struct AbstractBlock {
    /// Character data appears before the first child element
    pub has_leading_text: bool,
    /// All text content, nested elements included
    pub text: String,
}

#[derive(Debug, Default, Clone)]
pub struct MeshDescriptor {
    pub ui: Option<String>,
    pub name: String,
}

/// One cited work; `pubmed_ids` are its `IdType="pubmed"` identifiers
#[derive(Debug, Default, Clone)]
pub struct Reference {
    pub pubmed_ids: Vec<String>,
}

/// Parsed PubMed article
#[derive(Debug, Default)]
pub struct PubmedArticle {
    /// `PubmedData/ArticleIdList/ArticleId[@IdType="pubmed"]`
    pub pubmed_id: Option<String>,

    // Article
    pub title: Option<String>,
    pub abstracts: Vec<AbstractBlock>,
    pub journal_title: Option<String>,
    pub authors: Vec<Author>,

    // Dates
    pub article_dates: Vec<TypedDate>,
    pub date_revised: Option<DateParts>,
    pub history: Vec<TypedDate>,

    // Subject terms
    pub keywords: Vec<String>,
    pub mesh_descriptors: Vec<MeshDescriptor>,

    // References
    pub references: Vec<Reference>,
}

impl PubmedArticle {
    /// Whether any MeSH descriptor carries exactly this `UI`
    pub fn has_descriptor(&self, ui: &str) -> bool {
        self.mesh_descriptors
            .iter()
            .any(|d| d.ui.as_deref() == Some(ui))
    }
}

/// Pull-based reader yielding one article at a time
pub struct ArticleReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> ArticleReader<R> {
    pub fn new(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        // mixed content (titles with <i>, <sup>) needs its whitespace
        reader.config_mut().trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Next `<PubmedArticle>` in document order; `DeleteCitation` blocks are skipped
    pub fn next_article(&mut self) -> XmlResult<Option<PubmedArticle>> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) if e.name().as_ref() == b"PubmedArticle" => {
                    return parse_article(&mut self.reader).map(Some);
                }
                Event::Start(e) if e.name().as_ref() == b"DeleteCitation" => {
                    skip_element(&mut self.reader, b"DeleteCitation")?;
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ArticleReader<R> {
    type Item = XmlResult<PubmedArticle>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_article().transpose()
    }
}

/// Parse every article of an in-memory document
pub fn parse_pubmed_xml(xml: &str) -> XmlResult<Vec<PubmedArticle>> {
    ArticleReader::new(xml.as_bytes()).collect()
}

fn eof(inside: &[u8]) -> XmlError {
    XmlError::UnexpectedEof(String::from_utf8_lossy(inside).into_owned())
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn parse_article<R: BufRead>(reader: &mut Reader<R>) -> XmlResult<PubmedArticle> {
    let mut article = PubmedArticle::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"MedlineCitation" => parse_medline_citation(reader, &mut article)?,
                b"PubmedData" => parse_pubmed_data(reader, &mut article)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubmedArticle" => break,
            Event::Eof => return Err(eof(b"PubmedArticle")),
            _ => {}
        }
        buf.clear();
    }

    Ok(article)
}

fn parse_medline_citation<R: BufRead>(
    reader: &mut Reader<R>,
    article: &mut PubmedArticle,
) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"DateRevised" => {
                    article.date_revised = Some(parse_date_parts(reader, b"DateRevised")?)
                }
                b"Article" => parse_article_element(reader, article)?,
                b"MeshHeadingList" => parse_mesh_list(reader, &mut article.mesh_descriptors)?,
                b"KeywordList" => parse_keyword_list(reader, &mut article.keywords)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"MedlineCitation" => break,
            Event::Eof => return Err(eof(b"MedlineCitation")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_article_element<R: BufRead>(
    reader: &mut Reader<R>,
    article: &mut PubmedArticle,
) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Journal" => parse_journal(reader, article)?,
                b"ArticleTitle" => {
                    article.title = Some(read_text_content(reader, b"ArticleTitle")?)
                }
                b"Abstract" => article.abstracts.push(parse_abstract(reader)?),
                b"AuthorList" => parse_author_list(reader, &mut article.authors)?,
                b"ArticleDate" => {
                    let kind = attr_value(&e, b"DateType");
                    let date = parse_date_parts(reader, b"ArticleDate")?;
                    article.article_dates.push(TypedDate { kind, date });
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"ArticleTitle" => article.title = Some(String::new()),
                b"Abstract" => article.abstracts.push(AbstractBlock::default()),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Article" => break,
            Event::Eof => return Err(eof(b"Article")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_journal<R: BufRead>(reader: &mut Reader<R>, article: &mut PubmedArticle) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Title" => {
                let title = read_text_content(reader, b"Title")?;
                article.journal_title.get_or_insert(title);
            }
            Event::End(e) if e.name().as_ref() == b"Journal" => break,
            Event::Eof => return Err(eof(b"Journal")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_abstract<R: BufRead>(reader: &mut Reader<R>) -> XmlResult<AbstractBlock> {
    let mut block = AbstractBlock::default();
    let mut buf = Vec::new();
    let mut before_first_child = true;
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => {
                let text = e.unescape()?;
                if before_first_child && !text.is_empty() {
                    block.has_leading_text = true;
                }
                block.text.push_str(&text);
            }
            Event::CData(e) => {
                if before_first_child && !e.is_empty() {
                    block.has_leading_text = true;
                }
                block.text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Start(_) => {
                before_first_child = false;
                depth += 1;
            }
            Event::Empty(_) => before_first_child = false,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(eof(b"Abstract")),
            _ => {}
        }
        buf.clear();
    }

    Ok(block)
}

fn parse_author_list<R: BufRead>(reader: &mut Reader<R>, authors: &mut Vec<Author>) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Author" => {
                authors.push(parse_author(reader)?);
            }
            Event::Empty(e) if e.name().as_ref() == b"Author" => authors.push(Author::default()),
            Event::End(e) if e.name().as_ref() == b"AuthorList" => break,
            Event::Eof => return Err(eof(b"AuthorList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_author<R: BufRead>(reader: &mut Reader<R>) -> XmlResult<Author> {
    let mut author = Author::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"LastName" => author.last_name = Some(read_text_content(reader, b"LastName")?),
                b"ForeName" => author.fore_name = Some(read_text_content(reader, b"ForeName")?),
                b"Initials" => author.initials = Some(read_text_content(reader, b"Initials")?),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"Author" => break,
            Event::Eof => return Err(eof(b"Author")),
            _ => {}
        }
        buf.clear();
    }

    Ok(author)
}

fn parse_mesh_list<R: BufRead>(
    reader: &mut Reader<R>,
    descriptors: &mut Vec<MeshDescriptor>,
) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"DescriptorName" => {
                let ui = attr_value(&e, b"UI");
                let name = read_text_content(reader, b"DescriptorName")?;
                descriptors.push(MeshDescriptor { ui, name });
            }
            Event::Empty(e) if e.name().as_ref() == b"DescriptorName" => {
                descriptors.push(MeshDescriptor {
                    ui: attr_value(&e, b"UI"),
                    name: String::new(),
                });
            }
            Event::End(e) if e.name().as_ref() == b"MeshHeadingList" => break,
            Event::Eof => return Err(eof(b"MeshHeadingList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_keyword_list<R: BufRead>(reader: &mut Reader<R>, keywords: &mut Vec<String>) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"Keyword" => {
                let keyword = read_text_content(reader, b"Keyword")?;
                if !keyword.is_empty() {
                    keywords.push(keyword);
                }
            }
            Event::End(e) if e.name().as_ref() == b"KeywordList" => break,
            Event::Eof => return Err(eof(b"KeywordList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_pubmed_data<R: BufRead>(reader: &mut Reader<R>, article: &mut PubmedArticle) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"History" => parse_history(reader, &mut article.history)?,
                b"ArticleIdList" => parse_article_id_list(reader, article)?,
                b"ReferenceList" => parse_reference_list(reader, &mut article.references)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"PubmedData" => break,
            Event::Eof => return Err(eof(b"PubmedData")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_history<R: BufRead>(reader: &mut Reader<R>, history: &mut Vec<TypedDate>) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"PubMedPubDate" => {
                let kind = attr_value(&e, b"PubStatus");
                let date = parse_date_parts(reader, b"PubMedPubDate")?;
                history.push(TypedDate { kind, date });
            }
            Event::End(e) if e.name().as_ref() == b"History" => break,
            Event::Eof => return Err(eof(b"History")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_article_id_list<R: BufRead>(
    reader: &mut Reader<R>,
    article: &mut PubmedArticle,
) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"ArticleId" => {
                let is_pubmed = attr_value(&e, b"IdType").as_deref() == Some("pubmed");
                let value = read_text_content(reader, b"ArticleId")?;
                if is_pubmed {
                    article.pubmed_id.get_or_insert(value);
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"ArticleId" => {
                if attr_value(&e, b"IdType").as_deref() == Some("pubmed") {
                    article.pubmed_id.get_or_insert_with(String::new);
                }
            }
            Event::End(e) if e.name().as_ref() == b"ArticleIdList" => break,
            Event::Eof => return Err(eof(b"ArticleIdList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_reference_list<R: BufRead>(
    reader: &mut Reader<R>,
    references: &mut Vec<Reference>,
) -> XmlResult<()> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Reference" => references.push(parse_reference(reader)?),
                b"ReferenceList" => parse_reference_list(reader, references)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"ReferenceList" => break,
            Event::Eof => return Err(eof(b"ReferenceList")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_reference<R: BufRead>(reader: &mut Reader<R>) -> XmlResult<Reference> {
    let mut reference = Reference::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"ArticleId" => {
                let is_pubmed = attr_value(&e, b"IdType").as_deref() == Some("pubmed");
                let value = read_text_content(reader, b"ArticleId")?;
                if is_pubmed && !value.is_empty() {
                    reference.pubmed_ids.push(value.trim().to_string());
                }
            }
            Event::End(e) if e.name().as_ref() == b"Reference" => break,
            Event::Eof => return Err(eof(b"Reference")),
            _ => {}
        }
        buf.clear();
    }

    Ok(reference)
}

/// Read Year/Month/Day children until `</end_tag>`
fn parse_date_parts<R: BufRead>(reader: &mut Reader<R>, end_tag: &[u8]) -> XmlResult<DateParts> {
    let mut date = DateParts::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"Year" => date.year = Some(read_text_content(reader, b"Year")?.trim().to_string()),
                b"Month" => {
                    date.month = Some(read_text_content(reader, b"Month")?.trim().to_string())
                }
                b"Day" => date.day = Some(read_text_content(reader, b"Day")?.trim().to_string()),
                other => {
                    let other = other.to_vec();
                    skip_element(reader, &other)?;
                }
            },
            Event::End(e) if e.name().as_ref() == end_tag => break,
            Event::Eof => return Err(eof(end_tag)),
            _ => {}
        }
        buf.clear();
    }

    Ok(date)
}

fn skip_element<R: BufRead>(reader: &mut Reader<R>, end_tag: &[u8]) -> XmlResult<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(eof(end_tag)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Read all text content of the current element, handling nested tags
fn read_text_content<R: BufRead>(reader: &mut Reader<R>, end_tag: &[u8]) -> XmlResult<String> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(eof(end_tag)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>36464820</PMID>
      <Article>
        <Journal>
          <Title>Clinical endoscopy</Title>
        </Journal>
        <ArticleTitle>Test Article</ArticleTitle>
        <Abstract>
          <AbstractText>This is the abstract.</AbstractText>
        </Abstract>
      </Article>
      <MeshHeadingList>
        <MeshHeading>
          <DescriptorName UI="D004724" MajorTopicYN="Y">Endoscopy</DescriptorName>
        </MeshHeading>
      </MeshHeadingList>
    </MedlineCitation>
    <PubmedData>
      <ArticleIdList>
        <ArticleId IdType="doi">10.1234/test</ArticleId>
        <ArticleId IdType="pubmed">36464820</ArticleId>
      </ArticleIdList>
    </PubmedData>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn parse_basic_article() {
        let articles = parse_pubmed_xml(SAMPLE_XML).unwrap();
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article.pubmed_id.as_deref(), Some("36464820"));
        assert_eq!(article.title.as_deref(), Some("Test Article"));
        assert_eq!(article.journal_title.as_deref(), Some("Clinical endoscopy"));
        assert_eq!(article.abstracts.len(), 1);
        assert!(article.abstracts[0].has_leading_text);
        assert!(article.abstracts[0].text.contains("This is the abstract."));
    }

    #[test]
    fn parse_mesh_descriptors() {
        let articles = parse_pubmed_xml(SAMPLE_XML).unwrap();
        let article = &articles[0];

        assert_eq!(article.mesh_descriptors.len(), 1);
        assert_eq!(article.mesh_descriptors[0].name, "Endoscopy");
        assert_eq!(article.mesh_descriptors[0].ui.as_deref(), Some("D004724"));
        assert!(article.has_descriptor("D004724"));
        assert!(!article.has_descriptor("D00472"));
    }

    #[test]
    fn title_keeps_nested_markup_text() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation><Article>
<ArticleTitle>Role of <i>H. pylori</i> in CO<sub>2</sub> [review]</ArticleTitle>
</Article></MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        assert_eq!(
            articles[0].title.as_deref(),
            Some("Role of H. pylori in CO2 [review]")
        );
    }

    #[test]
    fn empty_and_missing_title_differ() {
        let xml = r#"<PubmedArticleSet>
<PubmedArticle><MedlineCitation><Article><ArticleTitle/></Article></MedlineCitation></PubmedArticle>
<PubmedArticle><MedlineCitation><Article><ArticleTitle></ArticleTitle></Article></MedlineCitation></PubmedArticle>
<PubmedArticle><MedlineCitation><Article></Article></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        assert_eq!(articles[0].title.as_deref(), Some(""));
        assert_eq!(articles[1].title.as_deref(), Some(""));
        assert!(articles[2].title.is_none());
    }

    #[test]
    fn abstract_without_leading_text() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation><Article>
<Abstract><AbstractText>Tight.</AbstractText></Abstract>
</Article></MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        let block = &articles[0].abstracts[0];
        assert!(!block.has_leading_text);
        assert_eq!(block.text, "Tight.");
    }

    #[test]
    fn parse_authors() {
        let xml = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>99999</PMID>
      <Article>
        <AuthorList>
          <Author>
            <LastName>Smith</LastName>
            <ForeName>John</ForeName>
            <Initials>J</Initials>
            <AffiliationInfo>
              <Affiliation>University of Test</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author>
            <LastName>Doe</LastName>
            <Initials>JD</Initials>
          </Author>
          <Author>
            <CollectiveName>World Health Organization</CollectiveName>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        let authors = &articles[0].authors;

        assert_eq!(authors.len(), 3);
        assert_eq!(authors[0].last_name.as_deref(), Some("Smith"));
        assert_eq!(authors[0].fore_name.as_deref(), Some("John"));
        assert_eq!(authors[1].fore_name, None);
        assert_eq!(authors[1].initials.as_deref(), Some("JD"));
        assert!(authors[2].last_name.is_none());
    }

    #[test]
    fn parse_dates() {
        let xml = r#"<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <DateRevised><Year>2023</Year><Month>01</Month><Day>09</Day></DateRevised>
      <Article>
        <ArticleDate DateType="Electronic"><Year>2022</Year><Month>10</Month><Day>05</Day></ArticleDate>
      </Article>
    </MedlineCitation>
    <PubmedData>
      <History>
        <PubMedPubDate PubStatus="received"><Year>2022</Year><Month>5</Month><Day>1</Day></PubMedPubDate>
        <PubMedPubDate PubStatus="accepted"><Year>2022</Year><Month>8</Month><Day>20</Day><Hour>6</Hour></PubMedPubDate>
      </History>
    </PubmedData>
  </PubmedArticle>
</PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        let article = &articles[0];

        assert_eq!(
            article.date_revised.as_ref().and_then(DateParts::to_ymd).as_deref(),
            Some("2023-01-09")
        );
        assert_eq!(article.article_dates[0].kind.as_deref(), Some("Electronic"));
        assert_eq!(article.article_dates[0].date.to_ymd().as_deref(), Some("2022-10-05"));
        assert_eq!(article.history.len(), 2);
        assert_eq!(article.history[1].kind.as_deref(), Some("accepted"));
        assert_eq!(article.history[1].date.to_ymd().as_deref(), Some("2022-8-20"));
    }

    #[test]
    fn incomplete_date_has_no_ymd() {
        let date = DateParts {
            year: Some("2024".to_string()),
            month: Some("Dec".to_string()),
            day: None,
        };
        assert_eq!(date.to_ymd(), None);
    }

    #[test]
    fn parse_keywords() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
      <KeywordList Owner="NOTNLM">
        <Keyword MajorTopicYN="N">machine learning</Keyword>
        <Keyword MajorTopicYN="N"></Keyword>
        <Keyword MajorTopicYN="N">neural networks</Keyword>
      </KeywordList>
</MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        assert_eq!(articles[0].keywords, vec!["machine learning", "neural networks"]);
    }

    #[test]
    fn references_kept_apart_from_article_ids() {
        let xml = r#"<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation><PMID>36464820</PMID></MedlineCitation>
    <PubmedData>
      <ReferenceList>
        <Reference>
          <Citation>First cited work.</Citation>
          <ArticleIdList>
            <ArticleId IdType="doi">10.1000/x</ArticleId>
            <ArticleId IdType="pubmed">36464821</ArticleId>
          </ArticleIdList>
        </Reference>
        <Reference>
          <Citation>No identifiers.</Citation>
        </Reference>
      </ReferenceList>
      <ArticleIdList>
        <ArticleId IdType="pubmed">36464820</ArticleId>
      </ArticleIdList>
    </PubmedData>
  </PubmedArticle>
</PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        let article = &articles[0];

        assert_eq!(article.pubmed_id.as_deref(), Some("36464820"));
        assert_eq!(article.references.len(), 2);
        assert_eq!(article.references[0].pubmed_ids, vec!["36464821"]);
        assert!(article.references[1].pubmed_ids.is_empty());
    }

    #[test]
    fn parse_empty_set() {
        let xml = r#"<?xml version="1.0"?>
<PubmedArticleSet>
</PubmedArticleSet>"#;

        assert!(parse_pubmed_xml(xml).unwrap().is_empty());
    }

    #[test]
    fn parse_multiple_articles_in_order() {
        let xml = r#"<PubmedArticleSet>
  <PubmedArticle><MedlineCitation><Article><ArticleTitle>First</ArticleTitle></Article></MedlineCitation></PubmedArticle>
  <PubmedArticle><MedlineCitation><Article><ArticleTitle>Second</ArticleTitle></Article></MedlineCitation></PubmedArticle>
  <PubmedArticle><MedlineCitation><Article><ArticleTitle>Third</ArticleTitle></Article></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

        let titles: Vec<String> = parse_pubmed_xml(xml)
            .unwrap()
            .into_iter()
            .filter_map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn delete_citation_skipped() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<PubmedArticleSet>
  <DeleteCitation>
    <PMID Version="1">12345</PMID>
  </DeleteCitation>
  <PubmedArticle>
    <MedlineCitation><PMID>99999999</PMID></MedlineCitation>
    <PubmedData><ArticleIdList><ArticleId IdType="pubmed">99999999</ArticleId></ArticleIdList></PubmedData>
  </PubmedArticle>
</PubmedArticleSet>"#;

        let articles = parse_pubmed_xml(xml).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].pubmed_id.as_deref(), Some("99999999"));
    }

    #[test]
    fn truncated_document_is_an_error() {
        let xml = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>12345</PMID>
      <Article>
        <ArticleTitle>Test"#;

        let err = parse_pubmed_xml(xml).unwrap_err();
        assert!(matches!(err, XmlError::UnexpectedEof(_)));
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation></PubmedArticle></PubmedArticleSet>";
        assert!(matches!(parse_pubmed_xml(xml), Err(XmlError::Xml(_))));
    }
}
