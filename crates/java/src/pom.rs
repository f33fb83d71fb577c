use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use buildplan_core::PublishingDescriptor;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";
const POM_SCHEMA_LOCATION: &str =
    "http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd";

/// Render the Maven POM of a publication.
///
/// # Errors
/// Returns error if the XML cannot be written.
pub fn render_pom(descriptor: &PublishingDescriptor) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let project = BytesStart::new("project").with_attributes([
        ("xmlns", POM_NAMESPACE),
        ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ("xsi:schemaLocation", POM_SCHEMA_LOCATION),
    ]);
    writer.write_event(Event::Start(project))?;

    let coordinates = &descriptor.coordinates;
    let pom = &descriptor.pom;
    text_element(&mut writer, "modelVersion", "4.0.0")?;
    text_element(&mut writer, "groupId", &coordinates.group_id)?;
    text_element(&mut writer, "artifactId", &coordinates.artifact_id)?;
    text_element(&mut writer, "version", &coordinates.version)?;
    text_element(&mut writer, "name", &pom.name)?;
    if let Some(description) = &pom.description {
        text_element(&mut writer, "description", description)?;
    }
    text_element(&mut writer, "url", &pom.url)?;
    if let Some(year) = pom.inception_year {
        text_element(&mut writer, "inceptionYear", &year.to_string())?;
    }

    start(&mut writer, "licenses")?;
    for license in &pom.licenses {
        start(&mut writer, "license")?;
        text_element(&mut writer, "name", &license.name)?;
        text_element(&mut writer, "url", &license.url)?;
        text_element(&mut writer, "distribution", &license.distribution)?;
        end(&mut writer, "license")?;
    }
    end(&mut writer, "licenses")?;

    start(&mut writer, "developers")?;
    for developer in &pom.developers {
        start(&mut writer, "developer")?;
        text_element(&mut writer, "id", &developer.id)?;
        text_element(&mut writer, "name", &developer.name)?;
        if !developer.email.is_empty() {
            text_element(&mut writer, "email", &developer.email)?;
        }
        end(&mut writer, "developer")?;
    }
    end(&mut writer, "developers")?;

    start(&mut writer, "scm")?;
    text_element(&mut writer, "connection", &pom.scm.connection)?;
    text_element(&mut writer, "developerConnection", &pom.scm.developer_connection)?;
    text_element(&mut writer, "url", &pom.scm.url)?;
    end(&mut writer, "scm")?;

    end(&mut writer, "project")?;

    let mut xml = writer.into_inner().into_inner();
    xml.push(b'\n');
    String::from_utf8(xml).context("Failed to convert POM to UTF-8")
}

fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    start(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}
