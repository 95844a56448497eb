//! End-to-end conversion tests.
//!
//! Each test feeds a small DocBook document through [`docbookrx::convert`]
//! and checks the AsciiDoc it produces.

use docbookrx::{ConversionOptions, Error, convert};

fn to_adoc(xml: &str) -> String {
    convert(xml, &ConversionOptions::default()).expect("conversion failed")
}

/// Keep paragraphs on one line, for inputs with several sentences.
fn to_adoc_unwrapped(xml: &str) -> String {
    let opts = ConversionOptions::default().with_sentence_per_line(false);
    convert(xml, &opts).expect("conversion failed")
}

// ============================================================================
// Document structure
// ============================================================================

#[test]
fn test_document_header() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<book xmlns="http://docbook.org/ns/docbook">
<info>
<title>Document Title</title>
<author>
<firstname>Doc</firstname>
<surname>Writer</surname>
<email>doc@example.com</email>
</author>
</info>
<section>
<title>First Section</title>
<para>content</para>
</section>
</book>
"#;

    let expected = "= Document Title
Doc Writer <doc@example.com>
:doctype: book
:sectnums:
:toc: left
:icons: font
:experimental:

== First Section

content";

    assert_eq!(to_adoc(input), expected);
}

#[test]
fn test_special_section_without_title() {
    assert!(to_adoc("<bibliography></bibliography>").contains("= Bibliography"));
}

#[test]
fn test_bridgeheads() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
  <section>
    <title>Section title</title>
    <bridgehead>Section bridgehead</bridgehead>
    <bridgehead renderas="sect3">level-three</bridgehead>
    <section>
      <title>subsub</title>
      <bridgehead>bridgebridge</bridgehead>
      <bridgehead renderas="sect1">level-one</bridgehead>
    </section>
  </section>
</article>"#;

    let output = to_adoc(input);
    assert!(output.contains("== Section title\n\n[float]\n=== Section bridgehead"));
    assert!(output.contains("[float]\n==== level-three"));
    assert!(output.contains("=== subsub\n\n[float]\n==== bridgebridge"));
    assert!(output.contains("[float]\n== level-one"));
}

// ============================================================================
// Inline markup
// ============================================================================

#[test]
fn test_guimenu_to_menu_macro() {
    let input = r#"<para xmlns="http://docbook.org/ns/docbook">File operations are found in the <guimenu>File</guimenu> menu.</para>"#;
    assert!(to_adoc(input).contains("menu:File[]"));
}

#[test]
fn test_menuchoice_to_menu_macro() {
    let input = r#"<para xmlns="http://docbook.org/ns/docbook">Select <menuchoice><guimenu>File</guimenu><guisubmenu>Open Terminal</guisubmenu><guimenuitem>Default</guimenuitem></menuchoice>.</para>"#;
    assert!(to_adoc(input).contains("menu:File[Open Terminal > Default]"));
}

#[test]
fn test_link_to_uri_macro() {
    let input = r#"<para xmlns="http://docbook.org/ns/docbook" xmlns:xlink="http://www.w3.org/1999/xlink">Read about <link xlink:href="http://en.wikipedia.org/wiki/Object-relational_mapping">Object-relational mapping</link> on Wikipedia.</para>"#;
    assert!(to_adoc(input).contains(
        "Read about http://en.wikipedia.org/wiki/Object-relational_mapping[Object-relational mapping] on Wikipedia."
    ));
}

#[test]
fn test_uri_elements() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
<para xmlns="http://docbook.org/ns/docbook" xmlns:xlink="http://www.w3.org/1999/xlink">Read about <uri xlink:href="http://en.wikipedia.org/wiki/Object-relational_mapping">Object-relational mapping</uri> on Wikipedia.</para>
<para>All DocBook V5.0 elements are in the namespace <uri>http://docbook.org/ns/docbook</uri>.</para>
</article>"#;

    let expected = "Read about http://en.wikipedia.org/wiki/Object-relational_mapping[Object-relational mapping] on Wikipedia.

All DocBook V5.0 elements are in the namespace http://docbook.org/ns/docbook.";

    assert!(to_adoc(input).contains(expected));
}

#[test]
fn test_ulink_with_doctype() {
    let input = r#"<!DOCTYPE para PUBLIC "-//OASIS//DTD DocBook XML V4.5//EN" "http://www.oasis-open.org/docbook/xml/4.5/docbookx.dtd">
<para xmlns="http://docbook.org/ns/docbook">Read about <ulink url="http://en.wikipedia.org/wiki/Object-relational_mapping">Object-relational mapping</ulink> on Wikipedia.</para>"#;
    assert!(to_adoc(input).contains(
        "Read about http://en.wikipedia.org/wiki/Object-relational_mapping[Object-relational mapping] on Wikipedia."
    ));
}

#[test]
fn test_uri_attribute_reference() {
    let input = r#"<para xmlns="http://docbook.org/ns/docbook" xmlns:xlink="http://www.w3.org/1999/xlink">Read about <uri xlink:href="http://en.wikipedia.org/wiki/Object-relational_mapping">Object-relational mapping</uri> on Wikipedia.</para>"#;
    let opts = ConversionOptions::default()
        .with_attribute("uri-orm", "http://en.wikipedia.org/wiki/Object-relational_mapping");
    let output = convert(input, &opts).unwrap();
    assert!(output.contains("Read about {uri-orm}[Object-relational mapping] on Wikipedia."));
}

#[test]
fn test_xref() {
    let opts = ConversionOptions::default().with_normalize_ids(false);
    let plain = r#"<para xmlns="http://docbook.org/ns/docbook">See <xref linkend="usage"/> for more information.</para>"#;
    assert!(convert(plain, &opts).unwrap().contains("<<usage>>"));

    let labeled = r#"<para xmlns="http://docbook.org/ns/docbook">See <xref linkend="usage">Usage</xref> for more information.</para>"#;
    assert!(convert(labeled, &opts).unwrap().contains("<<usage,Usage>>"));
}

#[test]
fn test_email_to_mailto() {
    let input = r#"<para xmlns="http://docbook.org/ns/docbook">Contact me at <email>info@example.org</email> for more information.</para>"#;
    assert!(to_adoc(input).contains("Contact me at mailto:info@example.org[] for more information."));
}

#[test]
fn test_quote() {
    assert!(to_adoc("<para><quote>Apples</quote></para>").contains("\"`Apples`\""));
}

#[test]
fn test_emphasis_doubles_marker_inside_words() {
    let input = "<para><emphasis>Apple</emphasis> or <emphasis>pine</emphasis>apple.</para>";
    assert!(to_adoc(input).contains("_Apple_ or __pine__apple"));
}

#[test]
fn test_bold_emphasis() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
  <para><emphasis role="bold">Singleton strategy</emphasis>- instructs RuntimeManager to do stuff</para>
</article>"#;
    assert!(to_adoc(input).contains("**Singleton strategy**- instructs RuntimeManager to do stuff"));
}

#[test]
fn test_abbrev_and_acronym() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
<para><acronym>Scuba</acronym> is an acronym while <abbrev>NSA</abbrev> is an abbreviation</para>
</article>"#;
    assert!(to_adoc(input).contains("`Scuba` is an acronym while `NSA` is an abbreviation"));
}

#[test]
fn test_hash_escaped_in_literal() {
    let input = "<para><code><emphasis>#{expression}</emphasis></code></para>";
    assert!(to_adoc(input).contains("`__\\#{expression}__`"));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_itemized_list() {
    let input = r#"<itemizedlist xmlns="http://docbook.org/ns/docbook">
<listitem><para>Apples</para></listitem>
<listitem><para>Oranges</para></listitem>
<listitem><para>Bananas</para></listitem>
</itemizedlist>"#;
    assert!(to_adoc(input).contains("* Apples\n* Oranges\n* Bananas"));
}

#[test]
fn test_ordered_list() {
    let input = r#"<orderedlist xmlns="http://docbook.org/ns/docbook">
<listitem><para>Apples</para></listitem>
<listitem><para>Oranges</para></listitem>
<listitem><para>Bananas</para></listitem>
</orderedlist>"#;
    assert!(to_adoc(input).contains(". Apples\n. Oranges\n. Bananas"));
}

#[test]
fn test_nested_ordered_list() {
    let input = "<orderedlist><listitem><para>a</para><orderedlist><listitem><para>b</para></listitem></orderedlist></listitem><listitem><para>c</para></listitem></orderedlist>";
    assert!(to_adoc(input).contains("\n. a\n.. b\n. c"));
}

#[test]
fn test_nested_itemized_list() {
    let input = "<itemizedlist><listitem><para>compact</para><itemizedlist><listitem><para>design</para></listitem><listitem><para>value</para></listitem></itemizedlist></listitem></itemizedlist>";
    assert!(to_adoc(input).contains("* compact\n** design\n** value"));
}

#[test]
fn test_mixed_nested_lists() {
    let input = "<itemizedlist><listitem><para>orcas</para><orderedlist><listitem><para>tuna</para><itemizedlist><listitem><para>squid</para><orderedlist><listitem><para>shrimp</para></listitem></orderedlist></listitem></itemizedlist></listitem><listitem><para>manta rays</para></listitem></orderedlist></listitem></itemizedlist>";
    assert!(to_adoc(input).contains("* orcas\n.. tuna\n*** squid\n.... shrimp\n.. manta rays"));
}

#[test]
fn test_qandaset() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
  <qandaset>
    <qandadiv>
      <title>Various Questions</title>
      <qandaentry xml:id="some-question">
        <question><para>My question?</para></question>
        <answer><para>My answer!</para></answer>
      </qandaentry>
      <qandaentry>
        <question><para>Another question?</para></question>
        <answer><para>Another answer!</para></answer>
      </qandaentry>
    </qandadiv>
  </qandaset>
  <para>A paragraph</para>
</article>"#;

    let expected = ".Various Questions

[qanda]
[[_some_question]]
My question?::

My answer!

Another question?::

Another answer!

A paragraph";

    assert!(to_adoc(input).contains(expected));
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_note_with_screen_is_delimited() {
    let input = "<note>
  <para>
    Please note the fruit:
    <screen>Apple, oranges and bananas</screen>
  </para>
</note>";

    let expected = "[NOTE]
====
Please note the fruit: 
----
Apple, oranges and bananas
----
====";

    assert!(to_adoc(input).contains(expected));
}

#[test]
fn test_single_paragraph_note_is_run_in() {
    let output = to_adoc("<note><para>Mind the gap</para></note>");
    assert!(output.contains("NOTE: Mind the gap"));
}

#[test]
fn test_funcsynopsis() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
<funcsynopsis>
  <funcprototype>
    <funcdef>int <function>rand</function></funcdef>
    <void/>
  </funcprototype>
</funcsynopsis>
</article>"#;
    assert!(to_adoc(input).contains("[source,c]\n----\nint rand (void);\n----"));
}

#[test]
fn test_bibliography() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'
         xmlns:xl="http://www.w3.org/1999/xlink"
         version="5.0" xml:lang="en">

<bibliography xml:id="references">
<bibliomixed>
<abbrev>RNCTUT</abbrev>
Clark, James – Cowan, John – MURATA, Makoto: <title>RELAX NG Compact Syntax Tutorial</title>.
Working Draft, 26 March 2003. OASIS. <bibliomisc><link xl:href="http://relaxng.org/compact-tutorial-20030326.html"/></bibliomisc>
</bibliomixed>
</bibliography>

</article>"#;

    let expected = "[bibliography]
[[_references]]
== Bibliography
- [[[RNCTUT]]] 
Clark, James – Cowan, John – MURATA, Makoto: RELAX NG Compact Syntax Tutorial.
Working Draft, 26 March 2003. OASIS. http://relaxng.org/compact-tutorial-20030326.html";

    assert!(to_adoc_unwrapped(input).contains(expected));
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_escapes_cell_delimiters() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
  <table>
    <tgroup cols="4">
      <thead>
        <row>
          <entry>Name</entry>
          <entry>Possible values</entry>
          <entry>Default value</entry>
          <entry>Description|Identity</entry>
        </row>
      </thead>
      <tbody>
        <row>
          <entry>Tom</entry>
          <entry>true|false|unknown</entry>
          <entry>unknown</entry>
          <entry>The quantum postman</entry>
        </row>
      </tbody>
    </tgroup>
  </table>
</article>"#;

    let expected = r#"
[cols="1,1,1,1", options="header"]
|===
| Name
| Possible values
| Default value
| Description\|Identity


|Tom
|true\|false\|unknown
|unknown
|The quantum postman
|==="#;

    assert!(to_adoc(input).contains(expected));
}

#[test]
fn test_table_with_too_few_header_cells() {
    let input = r#"<article xmlns='http://docbook.org/ns/docbook'>
  <table>
    <title>Control parameters</title>
    <tgroup cols="5">
      <thead>
        <row>
          <entry>Apple</entry>
          <entry>Bear</entry>
          <entry>Carrot</entry>
          <entry>Dam</entry>
        </row>
      </thead>
    </tgroup>
  </table>
</article>"#;

    let expected = r#".Control parameters
[cols="1,1,1,1,1", options="header"]
|===
| Apple
| Bear
| Carrot
| Dam
|==="#;

    assert!(to_adoc(input).contains(expected));
}

// ============================================================================
// Errors and recovery
// ============================================================================

#[test]
fn test_empty_input_has_no_root() {
    let opts = ConversionOptions::default();
    assert!(matches!(convert("", &opts), Err(Error::NoRoot)));
    assert!(matches!(
        convert("<?xml version=\"1.0\"?>\n<!-- nothing -->", &opts),
        Err(Error::NoRoot)
    ));
}

#[test]
fn test_unknown_element_is_commented_out() {
    let output = to_adoc("<article><mystery>odd</mystery></article>");
    assert!(output.contains("// <mystery>odd</mystery>"));
}

#[test]
fn test_unclosed_list_is_recovered() {
    let input = "<article><itemizedlist><listitem><para>layer</para></listitem><itemizedlist></article>";
    assert!(to_adoc(input).contains("* layer"));
}

#[test]
fn test_convert_bytes_uses_declared_encoding() {
    let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<para>Caf".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b" au lait</para>");
    let output = docbookrx::convert_bytes(&bytes, &ConversionOptions::default()).unwrap();
    assert!(output.contains("Caf\u{e9} au lait"));
}
